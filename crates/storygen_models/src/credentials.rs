//! API key storage and the interactive credential guard.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use storygen_error::{CredentialError, CredentialErrorKind, StorygenResult};
use storygen_interface::CredentialGuard;
use tracing::{debug, info, instrument, warn};

/// An API key. Debug output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// The raw key, for request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Shared slot holding the currently selected API key.
///
/// Clones share the same slot.
///
/// # Examples
///
/// ```
/// use storygen_models::CredentialStore;
///
/// let store = CredentialStore::new();
/// let shared = store.clone();
/// assert!(!store.is_present());
///
/// assert!(shared.set("  AIza-test-key  "));
/// assert_eq!(store.current().unwrap().expose(), "AIza-test-key");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    key: Arc<RwLock<Option<ApiKey>>>,
}

impl CredentialStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded from the first non-blank environment variable in `vars`.
    #[instrument(skip_all)]
    pub fn from_env(vars: &[String]) -> Self {
        let store = Self::new();
        for var in vars {
            let Ok(value) = std::env::var(var) else {
                continue;
            };
            if store.set(value) {
                debug!(source = %var, "API key loaded from environment");
                return store;
            }
        }
        debug!("No API key found in environment");
        store
    }

    /// Replace the key. Blank input is ignored and returns false.
    pub fn set(&self, key: impl Into<String>) -> bool {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        *self.key.write().unwrap_or_else(|e| e.into_inner()) = Some(ApiKey(key.to_string()));
        true
    }

    /// Forget the key.
    pub fn clear(&self) {
        *self.key.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// The latest key, if one is selected.
    pub fn current(&self) -> Option<ApiKey> {
        self.key.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// True when a key is selected.
    pub fn is_present(&self) -> bool {
        self.key.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

/// Source of an API key chosen interactively by the user.
#[async_trait]
pub trait KeyPrompt: Send + Sync {
    /// Ask for a key. `Ok(None)` means the user dismissed the prompt.
    async fn request_key(&self) -> StorygenResult<Option<String>>;
}

/// Credential guard backed by a [`CredentialStore`] and a [`KeyPrompt`].
#[derive(Clone)]
pub struct ApiKeyGuard {
    store: CredentialStore,
    prompt: Arc<dyn KeyPrompt>,
}

impl ApiKeyGuard {
    /// Guard `store`, asking `prompt` when a key must be selected.
    pub fn new(store: CredentialStore, prompt: Arc<dyn KeyPrompt>) -> Self {
        Self { store, prompt }
    }

    /// The guarded store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}

impl std::fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGuard")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialGuard for ApiKeyGuard {
    async fn has_credential(&self) -> bool {
        self.store.is_present()
    }

    #[instrument(skip(self))]
    async fn prompt_for_credential(&self) -> StorygenResult<()> {
        let selected = self.prompt.request_key().await.map_err(|e| {
            CredentialError::new(CredentialErrorKind::Prompt(e.to_string()))
        })?;

        match selected {
            Some(key) => {
                if self.store.set(key) {
                    info!("API key selected");
                } else {
                    warn!("Blank API key ignored");
                }
            }
            None => debug!("API key selection dismissed"),
        }
        Ok(())
    }
}
