use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Active account row in `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,          // assigned by the store
    pub email: String,    // unique among active users
    pub password: String, // Argon2 PHC string, never plaintext
    pub name: String,
    pub role: String, // free-form label, e.g. "admin" or "client"
}

/// Snapshot of a user taken at suspension time, row in `suspended_users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SuspendedUser {
    pub id: i64,
    pub user_id: i64, // id the row had in `users`
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub suspended_at: OffsetDateTime,
}

impl SuspendedUser {
    pub fn from_user(id: i64, user: &User, suspended_at: OffsetDateTime) -> Self {
        Self {
            id,
            user_id: user.id,
            email: user.email.clone(),
            password: user.password.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            suspended_at,
        }
    }
}

/// Values for a `users` insert; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}
