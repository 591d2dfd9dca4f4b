use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::auth::{
    error::AccountError,
    password::CredentialHasher,
    repo::AccountStore,
    repo_types::{NewUser, User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Input to [`CredentialManager::register`]; `password` is plaintext.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

/// Registration and login against the `users` table.
pub struct CredentialManager {
    store: Arc<dyn AccountStore>,
    hasher: CredentialHasher,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn AccountStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Create an account. The lookup beforehand only short-circuits the common
    /// case; the unique constraint on `email` decides concurrent registrations.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: Registration) -> Result<User, AccountError> {
        let email = normalize_email(&registration.email);

        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AccountError::Validation("Invalid email".into()));
        }
        if registration.password.is_empty() {
            warn!(email = %email, "empty password");
            return Err(AccountError::Validation("Password is required".into()));
        }

        match self.store.find_by_email(&email).await {
            Ok(Some(_)) => {
                warn!(email = %email, "email already registered");
                return Err(AccountError::AlreadyExists);
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "find_by_email failed");
                return Err(e.into());
            }
        }

        let hash = self.hash_off_thread(registration.password).await?;

        let new_user = NewUser {
            email: &email,
            password: &hash,
            name: &registration.name,
            role: &registration.role,
        };
        match self.store.insert_user(&new_user).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, role = %user.role, "user registered");
                Ok(user)
            }
            Err(e) if e.is_unique_violation() => {
                warn!(email = %email, "email registered concurrently");
                Err(AccountError::AlreadyExists)
            }
            Err(e) => {
                error!(error = %e, "insert user failed");
                Err(e.into())
            }
        }
    }

    /// Check a plaintext password against the stored hash and return the
    /// stored row unchanged.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = normalize_email(email);

        let user = match self.store.find_by_email(&email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(email = %email, "login unknown email");
                return Err(AccountError::NotRegistered);
            }
            Err(e) => {
                error!(error = %e, "find_by_email failed");
                return Err(e.into());
            }
        };

        let ok = self
            .verify_off_thread(password.to_owned(), user.password.clone())
            .await?;
        if !ok {
            warn!(email = %email, user_id = user.id, "login invalid password");
            return Err(AccountError::InvalidCredentials);
        }

        info!(user_id = user.id, email = %user.email, "user logged in");
        Ok(user)
    }

    async fn hash_off_thread(&self, plain: String) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&plain))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
    }

    async fn verify_off_thread(&self, plain: String, hash: String) -> Result<bool, AccountError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&plain, &hash))
            .await
            .map_err(|e| AccountError::Hashing(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("ana@forge.io"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@forge"));
        assert!(!is_valid_email("a na@forge.io"));
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ana@Forge.IO "), "ana@forge.io");
    }
}
