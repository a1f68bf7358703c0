//! Cross-view image handoff.
//!
//! A finished image travels to the visualizer over two paths:
//! 1. **Navigation state**: attached to the transition, lost on reload
//! 2. **Session store**: `uploadedImage:<key>`, survives reloads within the session
//!
//! Reads prefer the navigation state and fall back to the store. Store failures
//! and entries that aren't image data URIs both read as "absent".

mod navigation;
mod store;
#[cfg(target_arch = "wasm32")]
mod web_store;

use std::fmt;

pub use navigation::{Navigation, NavigationState, Route, SessionKey};
pub use store::{MemorySessionStore, SessionStore, StorageError};
#[cfg(target_arch = "wasm32")]
pub use web_store::BrowserSessionStore;

use crate::constants::STORAGE_KEY_PREFIX;
use crate::model::{DataUriError, EncodedImage};

/// Store key for a visualizer's session key.
pub fn storage_key(key: &SessionKey) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, key)
}

/// Failures on the fallback path. Callers treat all of them as "absent".
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored value for {key} is not an image: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: DataUriError,
    },
}

/// Producer and consumer ends of the handoff.
pub struct HandoffChannel {
    store: Box<dyn SessionStore>,
}

impl HandoffChannel {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Publish `image` under a fresh session key.
    pub fn complete(&mut self, image: EncodedImage) -> Navigation {
        self.complete_with_key(image, SessionKey::generate())
    }

    /// Publish `image` under `key`.
    ///
    /// The store write is best-effort; the returned navigation always carries
    /// the image.
    pub fn complete_with_key(&mut self, image: EncodedImage, key: SessionKey) -> Navigation {
        let store_key = storage_key(&key);
        match self.store.set_item(&store_key, image.as_str()) {
            Ok(()) => log::debug!("Handoff: stored {} ({} bytes)", store_key, image.len()),
            Err(e) => log::warn!("Handoff: session store write skipped: {}", e),
        }

        Navigation {
            target: Route::Visualizer(key),
            state: Some(NavigationState { image }),
        }
    }

    /// Resolve the image for `key`: navigation state first, then the store.
    pub fn retrieve(
        &self,
        key: &SessionKey,
        state: Option<&NavigationState>,
    ) -> Option<EncodedImage> {
        if let Some(state) = state {
            return Some(state.image.clone());
        }

        match self.lookup_session(key) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Handoff: treating {} as absent: {}", key, e);
                None
            }
        }
    }

    /// Look `key` up in the session store only.
    pub fn lookup_session(&self, key: &SessionKey) -> Result<Option<EncodedImage>, HandoffError> {
        let store_key = storage_key(key);
        let Some(raw) = self.store.get_item(&store_key)? else {
            return Ok(None);
        };

        EncodedImage::parse(&raw)
            .map(Some)
            .map_err(|source| HandoffError::Corrupt {
                key: store_key,
                source,
            })
    }

    /// Direct access to the backing store.
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn SessionStore {
        self.store.as_mut()
    }
}

impl fmt::Debug for HandoffChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandoffChannel").finish_non_exhaustive()
    }
}

impl Default for HandoffChannel {
    fn default() -> Self {
        Self::new(MemorySessionStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> EncodedImage {
        EncodedImage::encode("image/png", b"floor plan bytes")
    }

    #[test]
    fn test_storage_key_format() {
        assert_eq!(storage_key(&SessionKey::new("42")), "uploadedImage:42");
    }

    #[test]
    fn test_complete_writes_both_paths() {
        let mut channel = HandoffChannel::default();
        let key = SessionKey::new("k1");
        let nav = channel.complete_with_key(image(), key.clone());

        assert_eq!(nav.target, Route::Visualizer(key.clone()));
        assert_eq!(nav.state.as_ref().map(|s| &s.image), Some(&image()));
        assert_eq!(
            channel.store().get_item("uploadedImage:k1"),
            Ok(Some(image().as_str().to_string()))
        );
    }

    #[test]
    fn test_complete_generates_distinct_keys() {
        let mut channel = HandoffChannel::default();
        let a = channel.complete(image());
        let b = channel.complete(image());
        assert_ne!(a.target, b.target);
    }

    #[test]
    fn test_navigation_state_takes_precedence() {
        let mut channel = HandoffChannel::default();
        let key = SessionKey::new("k");
        channel.complete_with_key(image(), key.clone());

        let other = EncodedImage::encode("image/jpeg", b"other");
        let state = NavigationState {
            image: other.clone(),
        };
        assert_eq!(channel.retrieve(&key, Some(&state)), Some(other));
    }

    #[test]
    fn test_store_round_trip_after_reload() {
        let mut channel = HandoffChannel::default();
        let key = SessionKey::new("k");
        channel.complete_with_key(image(), key.clone());

        let restored = channel.retrieve(&key, None).unwrap();
        assert_eq!(restored, image());
        assert_eq!(restored.decode_bytes().unwrap(), b"floor plan bytes");
    }

    #[test]
    fn test_corrupted_entry_is_absent() {
        let mut channel = HandoffChannel::default();
        let key = SessionKey::new("k");
        channel
            .store_mut()
            .set_item(&storage_key(&key), "not-a-data-uri")
            .unwrap();

        assert!(matches!(
            channel.lookup_session(&key),
            Err(HandoffError::Corrupt { .. })
        ));
        assert_eq!(channel.retrieve(&key, None), None);
    }

    #[test]
    fn test_foreign_key_is_absent() {
        let mut channel = HandoffChannel::default();
        channel.complete_with_key(image(), SessionKey::new("a"));
        assert_eq!(channel.retrieve(&SessionKey::new("b"), None), None);
    }

    #[test]
    fn test_unavailable_store_degrades_silently() {
        let mut channel = HandoffChannel::new(MemorySessionStore::disabled());
        let key = SessionKey::new("k");

        let nav = channel.complete_with_key(image(), key.clone());
        assert!(nav.state.is_some());

        assert!(matches!(
            channel.lookup_session(&key),
            Err(HandoffError::Storage(StorageError::Unavailable(_)))
        ));
        assert_eq!(channel.retrieve(&key, None), None);
        assert_eq!(channel.retrieve(&key, nav.state.as_ref()), Some(image()));
    }

    #[test]
    fn test_quota_exceeded_still_navigates() {
        let mut channel = HandoffChannel::new(MemorySessionStore::with_quota(16));
        let key = SessionKey::new("k");

        let nav = channel.complete_with_key(image(), key.clone());
        assert_eq!(nav.state.map(|s| s.image), Some(image()));
        assert_eq!(channel.retrieve(&key, None), None);
    }
}
