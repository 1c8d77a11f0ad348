//! Error types for the StoryGen toolkit.
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the source location that raised it
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! All of them convert into [`StorygenError`] so callers can use `?` freely.
//!
//! # Examples
//!
//! ```
//! use storygen_error::{AnalysisError, AnalysisErrorKind, StorygenResult};
//!
//! fn analyze(script: &str) -> StorygenResult<usize> {
//!     if script.trim().is_empty() {
//!         Err(AnalysisError::new(AnalysisErrorKind::EmptyScript))?
//!     }
//!     Ok(script.lines().count())
//! }
//!
//! assert!(analyze("   ").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod chat;
mod config;
mod credential;
mod error;
mod gemini;
mod render;
mod storage;

pub use analysis::{AnalysisError, AnalysisErrorKind};
pub use chat::{ChatError, ChatErrorKind};
pub use config::ConfigError;
pub use credential::{CredentialError, CredentialErrorKind};
pub use error::{StorygenError, StorygenErrorKind, StorygenResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
