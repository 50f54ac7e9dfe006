//! Types for the admin login flow

use serde::{Deserialize, Serialize};

/// Role the console signs in with
pub const ADMIN_ROLE: &str = "admin";

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl LoginCredentials {
    /// Credentials for the admin role
    pub fn admin(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            role: ADMIN_ROLE.to_string(),
        }
    }
}

/// `data` payload of a successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub token: Option<String>,
}
