//! Routes and navigation transitions.

use std::fmt;

use crate::model::EncodedImage;

/// Identifies one visualizer instance and its session store entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    /// A fresh random key.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Views the application can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Entry point with the upload panel
    Home,
    /// Visualizer for one handed-off image
    Visualizer(SessionKey),
}

impl Route {
    const VISUALIZER_PREFIX: &'static str = "/visualizer/";

    /// URL path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Visualizer(key) => format!("{}{}", Self::VISUALIZER_PREFIX, key),
        }
    }

    /// Parse a URL path. Unknown paths yield None.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path.is_empty() || path == "/" {
            return Some(Route::Home);
        }
        let key = path.strip_prefix(Self::VISUALIZER_PREFIX)?;
        let key = key.trim_end_matches('/');
        if key.is_empty() || key.contains('/') {
            return None;
        }
        Some(Route::Visualizer(SessionKey::new(key)))
    }
}

/// In-memory state attached to a single transition.
///
/// Lives only until the next navigation or reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub image: EncodedImage,
}

/// A transition request for the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: Route,
    pub state: Option<NavigationState>,
}

impl Navigation {
    /// Plain navigation without state.
    pub fn to(target: Route) -> Self {
        Self {
            target,
            state: None,
        }
    }

    pub fn home() -> Self {
        Self::to(Route::Home)
    }
}
