use std::sync::{Arc, Mutex};

/// The signed-in user as seen by the quiz workflow.
///
/// The workflow only gates on presence and tags persisted results with the
/// identifier; interpreting credentials or tokens is the identity
/// collaborator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: Option<String>,
}

impl Principal {
    #[must_use]
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}

/// Narrow seam over the external identity provider.
pub trait PrincipalProvider: Send + Sync {
    /// The currently authenticated principal, if any.
    fn current(&self) -> Option<Principal>;
}

/// Switchable provider for tests and local runs.
///
/// Auth-state change notifications are delivered by flipping the stored
/// principal; consumers re-read `current` on each gated operation.
#[derive(Clone, Default)]
pub struct StaticPrincipalProvider {
    principal: Arc<Mutex<Option<Principal>>>,
}

impl StaticPrincipalProvider {
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(id: impl Into<String>, email: Option<String>) -> Self {
        let provider = Self::default();
        provider.set(Some(Principal::new(id, email)));
        provider
    }

    /// Replace the current principal (None signs out).
    pub fn set(&self, principal: Option<Principal>) {
        if let Ok(mut guard) = self.principal.lock() {
            *guard = principal;
        }
    }
}

impl PrincipalProvider for StaticPrincipalProvider {
    fn current(&self) -> Option<Principal> {
        self.principal.lock().ok().and_then(|guard| guard.clone())
    }
}
