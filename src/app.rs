// Declaro — Application wiring
//
// Builds the two repositories over one durable store. The session provider
// is shared by handle with the declaration repository, which only ever reads
// it through `SessionSource`.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{CredentialHasher, SessionProvider};
use crate::config::AppConfig;
use crate::error::Result;
use crate::kv::{Database, KvStore, SqliteKvStore};
use crate::store::PersistedDeclarationStore;

pub struct App {
    pub session: Arc<SessionProvider>,
    pub declarations: PersistedDeclarationStore,
}

impl App {
    /// Open the SQLite-backed store named by `config` and rehydrate both
    /// repositories from it.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let path = config.database_path();
        let db = Database::open(&path)?;
        let kv: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(Arc::new(db)));

        tracing::debug!(path = %path.display(), "Opening repositories");
        Self::with_kv(kv, config.hasher()?, config.latency())
    }

    /// Build both repositories over an existing key-value backend.
    pub fn with_kv(kv: Arc<dyn KvStore>, hasher: CredentialHasher, latency: Duration) -> Result<Self> {
        let session = Arc::new(SessionProvider::open(Arc::clone(&kv), hasher, latency)?);
        let declarations = PersistedDeclarationStore::open(kv, session.clone())?;

        Ok(Self {
            session,
            declarations,
        })
    }
}
