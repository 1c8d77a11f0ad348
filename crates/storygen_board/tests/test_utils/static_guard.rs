//! Credential guard with a fixed answer.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use storygen_error::StorygenResult;
use storygen_interface::CredentialGuard;

/// Guard whose credential is present or not, and whose prompt either
/// grants one or leaves things unchanged.
#[derive(Debug, Clone)]
pub struct StaticGuard {
    present: Arc<AtomicBool>,
    prompt_grants: bool,
    prompt_count: Arc<AtomicUsize>,
}

impl StaticGuard {
    /// Guard with a credential already present.
    pub fn present() -> Self {
        Self::new(true, true)
    }

    /// Guard without a credential; the prompt grants one if `prompt_grants`.
    pub fn absent(prompt_grants: bool) -> Self {
        Self::new(false, prompt_grants)
    }

    fn new(present: bool, prompt_grants: bool) -> Self {
        Self {
            present: Arc::new(AtomicBool::new(present)),
            prompt_grants,
            prompt_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompt_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialGuard for StaticGuard {
    async fn has_credential(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    async fn prompt_for_credential(&self) -> StorygenResult<()> {
        self.prompt_count.fetch_add(1, Ordering::SeqCst);
        if self.prompt_grants {
            self.present.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}
