//! StoryGen turns a screenplay into a storyboard.
//!
//! A script is segmented into scenes by a Gemini text model, every scene is
//! rendered concurrently by a Gemini image model, and a streaming chat
//! assistant helps with the writing. All model-backed operations sit behind a
//! credential gate.
//!
//! [`Studio`] wires the pieces together from a [`StorygenConfig`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use storygen::{KeyPrompt, StorygenConfig, StorygenResult, Studio, StudioOptions};
//!
//! struct NoPrompt;
//!
//! #[async_trait]
//! impl KeyPrompt for NoPrompt {
//!     async fn request_key(&self) -> StorygenResult<Option<String>> {
//!         Ok(None)
//!     }
//! }
//!
//! # async fn run() -> StorygenResult<()> {
//! let studio = Studio::open(StorygenConfig::load()?, Arc::new(NoPrompt), StudioOptions::default()).await?;
//! let batch = studio.board().analyze(storygen::SAMPLE_SCRIPT).await?;
//! batch.join().await;
//! studio.exporter().export_all(&studio.board().snapshot()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod studio;

pub use studio::{Studio, StudioOptions};

// Re-export error types
pub use storygen_error::{
    AnalysisError, AnalysisErrorKind, ChatError, ChatErrorKind, ConfigError, CredentialError,
    CredentialErrorKind, GeminiError, GeminiErrorKind, RenderError, RenderErrorKind,
    StorageError, StorageErrorKind, StorygenError, StorygenErrorKind, StorygenResult,
};

// Re-export core types
pub use storygen_core::{
    ChatMessage, ChatRole, ImageDataUri, ImageSize, Scene, SceneId, SceneOutline, TracingOptions,
    assemble_scenes, init_tracing,
};
#[cfg(feature = "observability")]
pub use storygen_core::shutdown_tracing;

// Re-export trait seams
pub use storygen_interface::{
    ChatAssistant, ChatSession, CredentialGuard, ImageRenderer, ScriptAnalyzer, TextStream,
};

// Re-export configuration
pub use storygen_config::StorygenConfig;

// Re-export model provider
pub use storygen_models::{ApiKey, ApiKeyGuard, CredentialStore, GeminiClient, KeyPrompt};

// Re-export script input and export
pub use storygen_storage::{ExportReport, ImageExporter, SAMPLE_SCRIPT, read_script};

// Re-export presentation state
pub use storygen_board::{
    CHAT_ERROR_MESSAGE, ChatPanel, ChatTurn, CredentialGate, RenderBatch, RenderPool, Storyboard,
    TurnOutcome,
};
