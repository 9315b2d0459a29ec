// Declaro — Session provider error types

use thiserror::Error;

use crate::kv::KvError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Kv(#[from] KvError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
