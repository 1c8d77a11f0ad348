//! Credential precondition for model-backed operations.

use std::sync::Arc;
use storygen_error::{CredentialError, CredentialErrorKind, StorygenResult};
use storygen_interface::CredentialGuard;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Open when a usable credential is present.
///
/// Evaluated once by [`CredentialGate::open`] and again after every
/// [`CredentialGate::select`]. Clones share state.
#[derive(Clone)]
pub struct CredentialGate {
    guard: Arc<dyn CredentialGuard>,
    state: Arc<watch::Sender<bool>>,
}

impl CredentialGate {
    /// Check `guard` once and build the gate.
    #[instrument(skip_all)]
    pub async fn open(guard: Arc<dyn CredentialGuard>) -> Self {
        let present = guard.has_credential().await;
        info!(open = present, "Credential gate evaluated");
        Self {
            guard,
            state: Arc::new(watch::Sender::new(present)),
        }
    }

    /// True when model-backed operations may run.
    pub fn is_open(&self) -> bool {
        *self.state.borrow()
    }

    /// Fail fast unless the gate is open.
    pub fn require(&self) -> StorygenResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CredentialError::new(CredentialErrorKind::Missing).into())
        }
    }

    /// Let the user pick a credential, then re-check it.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialErrorKind::Rejected`] when the guard still reports
    /// no credential after the selection, and propagates prompt failures.
    #[instrument(skip(self))]
    pub async fn select(&self) -> StorygenResult<()> {
        self.guard.prompt_for_credential().await?;

        let present = self.guard.has_credential().await;
        self.state.send_replace(present);
        if present {
            info!("Credential selected; gate open");
            Ok(())
        } else {
            warn!("Credential selection finished without a usable key");
            Err(CredentialError::new(CredentialErrorKind::Rejected).into())
        }
    }

    /// Watch the gate state.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

impl std::fmt::Debug for CredentialGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialGate")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
