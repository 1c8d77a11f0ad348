//! Capability traits for the StoryGen storyboard toolkit.
//!
//! Backends implement these traits; the storyboard and chat panel only ever
//! see them, which keeps the presentation state testable without a network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{
    ChatAssistant, ChatSession, CredentialGuard, ImageRenderer, ScriptAnalyzer, TextStream,
};
