//! Capability gate.
//!
//! Whether the user may ingest files is decided by an authentication
//! collaborator outside this crate; it reaches the core as a plain flag.

/// Permission to start an ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capability {
    /// Signed out; every gesture is silently ignored
    #[default]
    Denied,
    /// Signed in
    Allowed,
}

impl Capability {
    pub fn allows_ingestion(self) -> bool {
        matches!(self, Capability::Allowed)
    }
}

impl From<bool> for Capability {
    fn from(signed_in: bool) -> Self {
        if signed_in {
            Capability::Allowed
        } else {
            Capability::Denied
        }
    }
}
