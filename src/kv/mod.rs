// Declaro — Key-Value Module
//
// Durable storage shared by the session provider and the declaration
// repository. Values are JSON documents wrapped in a versioned envelope.

mod db;
mod error;
mod store;

use serde::{Deserialize, Serialize};

pub use db::Database;
pub use error::KvError;
pub use store::{KvStore, MemoryKvStore, SqliteKvStore};

/// Current layout version written alongside every persisted state.
pub const STATE_VERSION: u32 = 0;

/// On-disk wrapper around a repository's full state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    pub version: u32,
}

impl<T> Envelope<T> {
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: STATE_VERSION,
        }
    }
}
