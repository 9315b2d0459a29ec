// Declaro — Top-level error types
//
// Aggregates errors from the storage, auth, store and config modules into a
// single error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Declaro operations.
#[derive(Debug, Error)]
pub enum DeclaroError {
    #[error("Auth error: {0}")]
    Auth(#[from] crate::auth::AuthError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Storage error: {0}")]
    Kv(#[from] crate::kv::KvError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Invalid input: {0}")]
    Validation(#[from] crate::validation::ValidationErrors),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DeclaroError>;
