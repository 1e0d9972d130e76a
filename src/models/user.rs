//! User model for storage and API.

use crate::error::AppError;
use crate::models::Platform;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};

/// User account stored in the document store, keyed by username.
///
/// `password_hash` stays in the storage model only; API responses are built
/// from dedicated response structs that never include it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    /// Argon2 hash in PHC string format.
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub preferences: Preferences,
    pub created_at: String,
}

impl User {
    pub fn verify_password(&self, password: &str) -> bool {
        let parsed = match PasswordHash::new(&self.password_hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Per-user display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Platforms shown by default in the client.
    pub platforms: Vec<Platform>,
    pub theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            theme: "light".to_string(),
        }
    }
}
