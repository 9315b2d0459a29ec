// Declaro — Library root
//
// Re-exports the storage, auth, store, validation and CLI modules.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod kv;
pub mod status;
pub mod store;
pub mod validation;

pub use error::{DeclaroError, Result};
