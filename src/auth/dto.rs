use serde::{Deserialize, Serialize};

use crate::auth::{repo_types::SuspendedUser, services::Registration};

fn default_role() -> String {
    "client".into()
}

/// Request body for user registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Self {
            email: r.email,
            password: r.password,
            name: r.name,
            role: r.role,
        }
    }
}

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a suspension.
#[derive(Debug, Serialize)]
pub struct SuspendResponse {
    pub message: String,
    #[serde(rename = "suspendedUser")]
    pub suspended_user: SuspendedUser,
}
