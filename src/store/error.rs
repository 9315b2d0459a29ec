// Declaro — Declaration store error types

use thiserror::Error;

use crate::kv::KvError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Declaration not found: {0}")]
    NotFound(String),

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Storage error: {0}")]
    Kv(#[from] KvError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
