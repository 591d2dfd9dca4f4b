use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User already exists")]
    AlreadyExists,
    #[error("User not registered")]
    NotRegistered,
    #[error("Wrong password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("credential hashing failed: {0}")]
    Hashing(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}
