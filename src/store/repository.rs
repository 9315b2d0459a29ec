// Declaro — Declaration Repository
//
// CRUD over the ordered declaration sequence. The full sequence plus the
// "current" record are rewritten to the key-value store after every
// mutation. Listing never truncates the stored sequence; it only replaces
// the transient visible list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Declaration, DeclarationFields, DeclarationPatch};
use super::StoreError;
use crate::auth::SessionSource;
use crate::kv::{Envelope, KvStore};
use crate::status::OperationStatus;

/// Key under which the repository persists its state.
pub const DECLARATION_STORAGE_KEY: &str = "declaration-storage";

/// Owner recorded on declarations created while nobody is logged in.
pub const FALLBACK_USER_ID: &str = "anonymous";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over declaration storage operations.
pub trait DeclarationStore {
    /// Store a new declaration owned by the active user and make it current.
    fn create(&self, fields: DeclarationFields) -> Result<Declaration, StoreError>;

    /// Merge `patch` over the declaration with `id`. Returns the updated
    /// record, or `None` when no such declaration exists.
    fn update(&self, id: &str, patch: &DeclarationPatch) -> Result<Option<Declaration>, StoreError>;

    /// Remove the declaration with `id` (if present) and return the active
    /// user's remaining declarations.
    fn delete(&self, id: &str) -> Result<Vec<Declaration>, StoreError>;

    /// The active user's declarations, in insertion order.
    fn list_for_current_user(&self) -> Result<Vec<Declaration>, StoreError>;

    /// Look up a declaration and make it current.
    fn get_by_id(&self, id: &str) -> Result<Declaration, StoreError>;

    /// Forget the current declaration.
    fn clear_current(&self);
}

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeclarationState {
    declarations: Vec<Declaration>,
    current_declaration: Option<Declaration>,
    /// Result of the last listing; not persisted.
    #[serde(skip)]
    visible: Vec<Declaration>,
}

impl DeclarationState {
    fn owned_by(&self, user_id: Option<&str>) -> Vec<Declaration> {
        match user_id {
            Some(user_id) => self
                .declarations
                .iter()
                .filter(|d| d.user_id == user_id)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Draw ids from `generate` until one is not already taken.
fn unique_id(existing: &[Declaration], mut generate: impl FnMut() -> String) -> String {
    loop {
        let candidate = generate();
        if existing.iter().all(|d| d.id != candidate) {
            return candidate;
        }
        tracing::debug!(id = %candidate, "Declaration id collision, regenerating");
    }
}

// ─── Persisted Implementation ────────────────────────────────────────────────

pub struct PersistedDeclarationStore {
    kv: Arc<dyn KvStore>,
    session: Arc<dyn SessionSource>,
    state: Mutex<DeclarationState>,
    status: OperationStatus,
}

impl PersistedDeclarationStore {
    /// Rehydrate the repository from `kv`.
    pub fn open(kv: Arc<dyn KvStore>, session: Arc<dyn SessionSource>) -> Result<Self, StoreError> {
        let state = match kv.get(DECLARATION_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str::<Envelope<DeclarationState>>(&raw)?.state,
            None => DeclarationState::default(),
        };

        tracing::debug!(
            declarations = state.declarations.len(),
            "Declaration store rehydrated"
        );

        Ok(Self {
            kv,
            session,
            state: Mutex::new(state),
            status: OperationStatus::new(),
        })
    }

    /// The record staged for display, if any.
    pub fn current(&self) -> Option<Declaration> {
        self.lock_state().current_declaration.clone()
    }

    /// The result of the most recent listing or deletion.
    pub fn visible(&self) -> Vec<Declaration> {
        self.lock_state().visible.clone()
    }

    /// Every stored declaration regardless of owner, in insertion order.
    pub fn all(&self) -> Vec<Declaration> {
        self.lock_state().declarations.clone()
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

    fn lock_state(&self) -> MutexGuard<'_, DeclarationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the full state back to the key-value store. Failures are logged
    /// and otherwise ignored.
    fn persist(&self, state: &DeclarationState) {
        let raw = match serde_json::to_string(&Envelope::new(state)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize declaration state");
                return;
            }
        };

        if let Err(e) = self.kv.put(DECLARATION_STORAGE_KEY, &raw) {
            tracing::error!(error = %e, "Failed to persist declaration state");
        }
    }
}

impl DeclarationStore for PersistedDeclarationStore {
    fn create(&self, fields: DeclarationFields) -> Result<Declaration, StoreError> {
        let _loading = self.status.begin();
        let user_id = self
            .session
            .active_user_id()
            .unwrap_or_else(|| FALLBACK_USER_ID.to_string());

        let mut state = self.lock_state();
        let declaration = Declaration {
            id: unique_id(&state.declarations, || Uuid::new_v4().to_string()),
            user_id,
            created_at: Utc::now(),
            fields,
        };

        state.declarations.push(declaration.clone());
        state.current_declaration = Some(declaration.clone());
        self.persist(&state);

        tracing::info!(
            declaration_id = %declaration.id,
            user_id = %declaration.user_id,
            "Declaration created"
        );

        self.status.settle(Ok(declaration))
    }

    fn update(&self, id: &str, patch: &DeclarationPatch) -> Result<Option<Declaration>, StoreError> {
        let _loading = self.status.begin();
        let mut state = self.lock_state();

        let updated = match state.declarations.iter_mut().find(|d| d.id == id) {
            Some(declaration) => {
                patch.apply_to(&mut declaration.fields);
                declaration.clone()
            }
            None => {
                tracing::debug!(declaration_id = %id, "Update skipped, no such declaration");
                return self.status.settle(Ok(None));
            }
        };

        if state.current_declaration.as_ref().is_some_and(|d| d.id == id) {
            state.current_declaration = Some(updated.clone());
        }
        if let Some(slot) = state.visible.iter_mut().find(|d| d.id == id) {
            *slot = updated.clone();
        }
        self.persist(&state);

        tracing::info!(declaration_id = %id, "Declaration updated");
        self.status.settle(Ok(Some(updated)))
    }

    fn delete(&self, id: &str) -> Result<Vec<Declaration>, StoreError> {
        let _loading = self.status.begin();
        let user_id = self.session.active_user_id();
        let mut state = self.lock_state();

        let before = state.declarations.len();
        state.declarations.retain(|d| d.id != id);
        let removed = state.declarations.len() < before;

        if state.current_declaration.as_ref().is_some_and(|d| d.id == id) {
            state.current_declaration = None;
        }
        state.visible = state.owned_by(user_id.as_deref());

        if removed {
            self.persist(&state);
            tracing::info!(declaration_id = %id, "Declaration deleted");
        }

        let remaining = state.visible.clone();
        self.status.settle(Ok(remaining))
    }

    fn list_for_current_user(&self) -> Result<Vec<Declaration>, StoreError> {
        let user_id = match self.session.active_user_id() {
            Some(user_id) => user_id,
            None => return self.status.settle(Err(StoreError::Unauthenticated)),
        };

        let _loading = self.status.begin();
        let mut state = self.lock_state();
        state.visible = state.owned_by(Some(&user_id));

        let visible = state.visible.clone();
        self.status.settle(Ok(visible))
    }

    fn get_by_id(&self, id: &str) -> Result<Declaration, StoreError> {
        let _loading = self.status.begin();
        let mut state = self.lock_state();

        let found = state.declarations.iter().find(|d| d.id == id).cloned();
        state.current_declaration = found.clone();
        self.persist(&state);

        let result = found.ok_or_else(|| StoreError::NotFound(id.to_string()));
        self.status.settle(result)
    }

    fn clear_current(&self) {
        let mut state = self.lock_state();
        state.current_declaration = None;
        self.persist(&state);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
