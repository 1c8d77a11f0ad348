#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use storygen_error::{CredentialError, CredentialErrorKind, StorygenResult};
use storygen_models::KeyPrompt;

/// What the scripted prompt does when asked for a key.
#[derive(Debug, Clone)]
pub enum PromptBehavior {
    /// Answer with this key
    Key(String),
    /// User dismissed the prompt
    Dismiss,
    /// Prompt itself failed
    Fail(String),
}

/// Key prompt that replays a fixed behavior and counts calls.
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    behavior: PromptBehavior,
    call_count: Arc<Mutex<usize>>,
}

impl ScriptedPrompt {
    pub fn new(behavior: PromptBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl KeyPrompt for ScriptedPrompt {
    async fn request_key(&self) -> StorygenResult<Option<String>> {
        *self.call_count.lock().unwrap() += 1;
        match &self.behavior {
            PromptBehavior::Key(key) => Ok(Some(key.clone())),
            PromptBehavior::Dismiss => Ok(None),
            PromptBehavior::Fail(message) => {
                Err(CredentialError::new(CredentialErrorKind::Prompt(message.clone())).into())
            }
        }
    }
}
