//! Session-scoped key/value storage.
//!
//! Mirrors the browser's `sessionStorage`: string keys and values, lifetime
//! bounded by the browsing session, and operations that may fail when the
//! store is disabled or full.

use std::collections::HashMap;

use crate::constants::DEFAULT_SESSION_QUOTA_BYTES;

/// Errors from a session store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled or not reachable from this context
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the storage quota
    #[error("session storage quota exceeded ({needed} of {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Any other backend failure
    #[error("session storage error: {0}")]
    Backend(String),
}

/// A session-scoped string store.
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process session store with a browser-like quota.
///
/// Used by the native host, where the session is the process lifetime.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
    quota_bytes: usize,
    available: bool,
}

impl MemorySessionStore {
    /// Create a store with the default browser-like quota.
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_SESSION_QUOTA_BYTES)
    }

    /// Create a store holding at most `quota_bytes` of keys and values.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes,
            available: true,
        }
    }

    /// A store on which every operation fails, like disabled storage.
    pub fn disabled() -> Self {
        let mut store = Self::new();
        store.available = false;
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes used by all keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;

        let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
        let needed = self.used_bytes() - replaced + key.len() + value.len();
        if needed > self.quota_bytes {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemorySessionStore::new();
        assert_eq!(store.get_item("k"), Ok(None));

        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k"), Ok(Some("v".to_string())));
        assert_eq!(store.used_bytes(), 2);

        store.remove_item("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_quota_exceeded_keeps_old_value() {
        let mut store = MemorySessionStore::with_quota(10);
        store.set_item("k", "short").unwrap();

        let result = store.set_item("k", "much too long");
        assert!(matches!(result, Err(StorageError::QuotaExceeded { quota: 10, .. })));
        assert_eq!(store.get_item("k"), Ok(Some("short".to_string())));
    }

    #[test]
    fn test_overwrite_counts_replaced_entry() {
        let mut store = MemorySessionStore::with_quota(6);
        store.set_item("k", "12345").unwrap();
        // Replacing frees the old value first
        store.set_item("k", "54321").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_disabled_store_fails_everything() {
        let mut store = MemorySessionStore::disabled();
        assert!(matches!(store.get_item("k"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.set_item("k", "v"), Err(StorageError::Unavailable(_))));
        assert!(matches!(store.remove_item("k"), Err(StorageError::Unavailable(_))));
    }
}
