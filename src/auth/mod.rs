// Declaro — Auth Module
//
// Mock identity store: a small credential table seeded with one demo account
// and the single active session. Passwords are kept as Argon2id hashes.

mod error;
mod hasher;
mod models;
mod provider;

pub use error::AuthError;
pub use hasher::CredentialHasher;
pub use models::{CredentialEntry, ProfileUpdate, User};
pub use provider::{SessionProvider, SessionSource, AUTH_STORAGE_KEY};

#[cfg(test)]
pub(crate) use provider::mock;
