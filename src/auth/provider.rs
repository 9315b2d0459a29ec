// Declaro — Session Provider
//
// Owns the credential table and the single active session. The whole state
// is rewritten to the key-value store after every mutation and rehydrated on
// construction.
//
// Flow:
//   1. `open()` loads `auth-storage`, seeding the demo account on first run
//   2. `login()` / `register()` establish the session
//   3. other components read the session through `SessionSource`

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hasher::CredentialHasher;
use super::models::{CredentialEntry, ProfileUpdate, User};
use super::AuthError;
use crate::kv::{Envelope, KvStore};
use crate::status::OperationStatus;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Key under which the session provider persists its state.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

const DEMO_USER_ID: &str = "1";
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo123";
const DEMO_STORE_NAME: &str = "HAJI RAHMATHULLAH STORE";
const DEMO_STORE_ADDRESS: &str = "1, PARK ROAD, 01-K95B, PEOPLES PARK COMPLEX, SINGAPORE, 059108";

/// Placeholder profile given to freshly registered users.
const NEW_STORE_NAME: &str = "My Store";
const NEW_STORE_ADDRESS: &str = "Store Address";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only view of "who is logged in", handed to components that must
/// stamp or filter data by user without being able to change the session.
pub trait SessionSource: Send + Sync {
    fn active_user(&self) -> Option<User>;

    fn active_user_id(&self) -> Option<String> {
        self.active_user().map(|user| user.id)
    }
}

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthState {
    /// Keyed by lowercased username.
    users: BTreeMap<String, CredentialEntry>,
    session: Option<User>,
}

fn table_key(username: &str) -> String {
    username.to_lowercase()
}

// ─── Provider ────────────────────────────────────────────────────────────────

pub struct SessionProvider {
    kv: Arc<dyn KvStore>,
    hasher: CredentialHasher,
    latency: Duration,
    state: Mutex<AuthState>,
    status: OperationStatus,
}

impl SessionProvider {
    /// Rehydrate the provider from `kv`, seeding the demo account when no
    /// credential table has been stored yet.
    pub fn open(
        kv: Arc<dyn KvStore>,
        hasher: CredentialHasher,
        latency: Duration,
    ) -> Result<Self, AuthError> {
        let mut state = match kv.get(AUTH_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str::<Envelope<AuthState>>(&raw)?.state,
            None => AuthState::default(),
        };

        let seeded = state.users.is_empty();
        if seeded {
            let demo = User {
                id: DEMO_USER_ID.to_string(),
                username: DEMO_USERNAME.to_string(),
                store_name: DEMO_STORE_NAME.to_string(),
                store_address: DEMO_STORE_ADDRESS.to_string(),
            };
            let hash = hasher.hash(DEMO_PASSWORD)?;
            state
                .users
                .insert(table_key(DEMO_USERNAME), CredentialEntry::new(demo, hash));
            tracing::info!("Seeded demo account");
        }

        tracing::debug!(
            users = state.users.len(),
            authenticated = state.session.is_some(),
            "Session provider rehydrated"
        );

        let provider = Self {
            kv,
            hasher,
            latency,
            state: Mutex::new(state),
            status: OperationStatus::new(),
        };

        if seeded {
            provider.persist(&provider.lock_state());
        }

        Ok(provider)
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    pub fn current_user(&self) -> Option<User> {
        self.lock_state().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock_state().session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.status.last_error()
    }

    pub fn clear_error(&self) {
        self.status.clear_error();
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Authenticate against the credential table (username is matched
    /// case-insensitively). A failed attempt clears any existing session.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let _loading = self.status.begin();
        self.status.clear_error();
        self.simulate_latency().await;

        let result = self.try_login(username, password);
        self.status.settle(result)
    }

    fn try_login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let mut state = self.lock_state();

        let user = match state.users.get(&table_key(username)) {
            Some(entry) => self
                .hasher
                .verify(password, entry.password_hash())?
                .then(|| entry.user.clone()),
            None => None,
        };

        match user {
            Some(user) => {
                state.session = Some(user.clone());
                self.persist(&state);
                tracing::info!(user_id = %user.id, "Login succeeded");
                Ok(user)
            }
            None => {
                state.session = None;
                self.persist(&state);
                tracing::warn!(username = %username, "Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Create a new account with placeholder store details and make it the
    /// active session.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let _loading = self.status.begin();
        self.status.clear_error();
        self.simulate_latency().await;

        let result = self.try_register(username, password);
        self.status.settle(result)
    }

    fn try_register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let key = table_key(username);
        let mut state = self.lock_state();

        if state.users.contains_key(&key) {
            return Err(AuthError::UsernameTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            store_name: NEW_STORE_NAME.to_string(),
            store_address: NEW_STORE_ADDRESS.to_string(),
        };
        let hash = self.hasher.hash(password)?;

        state
            .users
            .insert(key, CredentialEntry::new(user.clone(), hash));
        state.session = Some(user.clone());
        self.persist(&state);

        tracing::info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// End the active session, if any.
    pub fn logout(&self) {
        let mut state = self.lock_state();
        if let Some(user) = state.session.take() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        self.persist(&state);
    }

    /// Merge `update` into the active session and its credential entry.
    /// Returns `Ok(None)` when nobody is logged in.
    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<User>, AuthError> {
        let result = self.try_update_profile(update);
        self.status.settle(result)
    }

    fn try_update_profile(&self, update: &ProfileUpdate) -> Result<Option<User>, AuthError> {
        let mut state = self.lock_state();

        let current = match state.session {
            Some(ref user) => user.clone(),
            None => return Ok(None),
        };

        let updated = update.merged(&current);
        let old_key = table_key(&current.username);
        let new_key = table_key(&updated.username);

        if new_key != old_key && state.users.contains_key(&new_key) {
            return Err(AuthError::UsernameTaken);
        }

        if let Some(mut entry) = state.users.remove(&old_key) {
            entry.user = updated.clone();
            state.users.insert(new_key, entry);
        }
        state.session = Some(updated.clone());
        self.persist(&state);

        tracing::info!(user_id = %updated.id, "Profile updated");
        Ok(Some(updated))
    }

    /// Replace the active user's password after verifying the current one.
    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        let _loading = self.status.begin();
        self.status.clear_error();
        self.simulate_latency().await;

        let result = self.try_change_password(current, new);
        self.status.settle(result)
    }

    fn try_change_password(&self, current: &str, new: &str) -> Result<(), AuthError> {
        let mut state = self.lock_state();

        let key = match state.session {
            Some(ref user) => table_key(&user.username),
            None => return Err(AuthError::UserNotFound),
        };

        let stored = match state.users.get(&key) {
            Some(entry) => entry.password_hash().to_string(),
            None => return Err(AuthError::UserNotFound),
        };

        if !self.hasher.verify(current, &stored)? {
            return Err(AuthError::IncorrectPassword);
        }

        let hash = self.hasher.hash(new)?;
        if let Some(entry) = state.users.get_mut(&key) {
            entry.set_password_hash(hash);
        }
        self.persist(&state);

        tracing::info!("Password changed");
        Ok(())
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the full state back to the key-value store. Failures are logged
    /// and otherwise ignored.
    fn persist(&self, state: &AuthState) {
        let raw = match serde_json::to_string(&Envelope::new(state)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize session state");
                return;
            }
        };

        if let Err(e) = self.kv.put(AUTH_STORAGE_KEY, &raw) {
            tracing::error!(error = %e, "Failed to persist session state");
        }
    }
}

impl SessionSource for SessionProvider {
    fn active_user(&self) -> Option<User> {
        self.current_user()
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────
