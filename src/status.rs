// Declaro — Operation status
//
// The transient "loading" flag and last-error slot that UI consumers poll.
// Operations report failures through their `Result`; the slot only mirrors
// the most recent message until a caller clears it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct OperationStatus {
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl OperationStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as in flight. The flag drops back to false when the
    /// returned guard goes out of scope.
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.loading.store(true, Ordering::SeqCst);
        LoadingGuard {
            flag: &self.loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn clear_error(&self) {
        *self.error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Mirror the outcome of an operation into the error slot.
    pub fn settle<T, E: std::fmt::Display>(&self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.clear_error(),
            Err(e) => self.set_error(e.to_string()),
        }
        result
    }
}

pub struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_flag_follows_guard() {
        let status = OperationStatus::new();
        assert!(!status.is_loading());
        {
            let _guard = status.begin();
            assert!(status.is_loading());
        }
        assert!(!status.is_loading());
    }

    #[test]
    fn test_settle_records_and_clears_error() {
        let status = OperationStatus::new();

        let failed: Result<(), String> = status.settle(Err("boom".to_string()));
        assert!(failed.is_err());
        assert_eq!(status.last_error().as_deref(), Some("boom"));

        let ok: Result<u8, String> = status.settle(Ok(1));
        assert_eq!(ok.unwrap(), 1);
        assert!(status.last_error().is_none());
    }

    #[test]
    fn test_clear_error() {
        let status = OperationStatus::new();
        status.set_error("Declaration not found");
        status.clear_error();
        assert!(status.last_error().is_none());
    }
}
