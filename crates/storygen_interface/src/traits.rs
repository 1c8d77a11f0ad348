//! Trait definitions for the model capabilities StoryGen relies on.

use async_trait::async_trait;
use futures_util::stream::Stream;
use std::pin::Pin;
use storygen_core::{ImageDataUri, ImageSize, SceneOutline};
use storygen_error::StorygenResult;

/// Incremental text fragments from a streaming chat turn.
///
/// Dropping the stream abandons the turn.
pub type TextStream = Pin<Box<dyn Stream<Item = StorygenResult<String>> + Send>>;

/// Splits a screenplay into ordered scene outlines.
#[async_trait]
pub trait ScriptAnalyzer: Send + Sync {
    /// Segment `script` into scenes, in narrative order.
    ///
    /// Fails with an analysis error when the script is blank, the endpoint
    /// returns nothing, or the payload is not an array of scene outlines.
    async fn analyze_script(&self, script: &str) -> StorygenResult<Vec<SceneOutline>>;
}

/// Produces a 16:9 frame for a visual prompt.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Render `prompt` at the requested resolution tier.
    async fn render(&self, prompt: &str, size: ImageSize) -> StorygenResult<ImageDataUri>;
}

/// Opens stateful chat sessions.
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Start a fresh conversation with the production assistant persona.
    async fn create_session(&self) -> StorygenResult<Box<dyn ChatSession>>;
}

/// A conversation whose history persists across turns.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Send one user turn and stream back the reply fragments.
    ///
    /// The turn joins the history only if its stream runs to completion.
    async fn send_turn(&self, text: &str) -> StorygenResult<TextStream>;

    /// Number of completed exchanges held in the history.
    fn turn_count(&self) -> usize;
}

/// Answers whether a usable API credential is present, and can ask for one.
#[async_trait]
pub trait CredentialGuard: Send + Sync {
    /// True when a credential is currently available.
    async fn has_credential(&self) -> bool;

    /// Interactively obtain a credential.
    async fn prompt_for_credential(&self) -> StorygenResult<()>;
}
