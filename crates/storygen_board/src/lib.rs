//! Presentation state for StoryGen.
//!
//! - [`CredentialGate`] decides whether model-backed operations may run
//! - [`RenderPool`] bounds concurrent image requests, one result channel per job
//! - [`Storyboard`] owns the scene list and the selected resolution
//! - [`ChatPanel`] owns the chat transcript and drives streaming turns
//!
//! Scene lists and transcripts are published as `Arc<Vec<_>>` snapshots over
//! `tokio::sync::watch`, so observers always see a whole list and concurrent
//! completions never overwrite each other.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat_panel;
mod gate;
mod pool;
mod storyboard;

pub use chat_panel::{CHAT_ERROR_MESSAGE, ChatPanel, ChatTurn, TurnOutcome};
pub use gate::CredentialGate;
pub use pool::{DEFAULT_MAX_IN_FLIGHT, RenderPool, RenderTicket};
pub use storyboard::{RenderBatch, Storyboard};
