use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::auth::error::AccountError;
use crate::sales::services::SalesError;

/// Error returned by handlers; rendered as `{ "message": ... }`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Sales(#[from] SalesError),
    /// Body or path the extractors could not accept.
    #[error("{message}")]
    Request { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Request {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Request {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Account(e) => match e {
                AccountError::AlreadyExists
                | AccountError::NotRegistered
                | AccountError::InvalidCredentials
                | AccountError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                AccountError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
                AccountError::Hashing(_) | AccountError::Storage(_) => internal(),
            },
            AppError::Sales(e) => match e {
                SalesError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                SalesError::Storage(_) => internal(),
            },
            AppError::Request { status, message } => (*status, message.clone()),
        }
    }
}

// storage and hashing details stay in the logs
fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if let AppError::Request { .. } = self {
            tracing::warn!(%status, %message, "request rejected");
        }
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    fn status_of(err: impl Into<AppError>) -> (StatusCode, String) {
        err.into().status_and_message()
    }

    #[test]
    fn user_facing_account_errors_are_bad_requests() {
        assert_eq!(
            status_of(AccountError::AlreadyExists),
            (StatusCode::BAD_REQUEST, "User already exists".into())
        );
        assert_eq!(
            status_of(AccountError::NotRegistered),
            (StatusCode::BAD_REQUEST, "User not registered".into())
        );
        assert_eq!(
            status_of(AccountError::InvalidCredentials),
            (StatusCode::BAD_REQUEST, "Wrong password".into())
        );
    }

    #[test]
    fn missing_user_is_not_found() {
        assert_eq!(status_of(AccountError::NotFound).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (status, message) = status_of(AccountError::Storage(StoreError::Backend(
            "connection reset by peer".into(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("connection reset"));
    }

    #[test]
    fn sales_validation_keeps_its_message() {
        let (status, message) =
            status_of(SalesError::Validation("quantity must be positive".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "quantity must be positive");
    }
}
