//! Browser `sessionStorage` backend (WASM only).

use super::store::{SessionStore, StorageError};
use crate::constants::DEFAULT_SESSION_QUOTA_BYTES;

/// `window.sessionStorage`, looked up on every call.
///
/// Sandboxed iframes and privacy modes can make the lookup itself throw,
/// so nothing is cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStore;

impl BrowserSessionStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object available".to_string()))?;
        window
            .session_storage()
            .map_err(|e| StorageError::Unavailable(format!("sessionStorage access error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("sessionStorage not available".to_string()))
    }
}

impl SessionStore for BrowserSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Browsers signal a full store with a QuotaExceededError DOMException;
        // the real quota isn't exposed, so report the usual one
        self.storage()?.set_item(key, value).map_err(|e| {
            let message = format!("{:?}", e);
            if message.contains("QuotaExceeded") {
                StorageError::QuotaExceeded {
                    needed: key.len() + value.len(),
                    quota: DEFAULT_SESSION_QUOTA_BYTES,
                }
            } else {
                StorageError::Backend(message)
            }
        })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}
