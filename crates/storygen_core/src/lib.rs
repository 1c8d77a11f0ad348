//! Core data types for the StoryGen storyboard toolkit.
//!
//! This crate provides the foundation types shared by every StoryGen crate:
//! scenes and their raw analyzer outlines, chat transcript messages, image
//! resolution tiers, and data URIs for rendered images.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat;
mod image;
mod scene;
mod telemetry;

pub use chat::{ChatMessage, ChatRole, MessageId};
pub use image::{IMAGE_MIME_TYPE, ImageDataUri, ImageSize, STORYBOARD_ASPECT_RATIO};
pub use scene::{
    DEFAULT_DESCRIPTION, DEFAULT_VISUAL_PROMPT, Scene, SceneId, SceneOutline, assemble_scenes,
};
#[cfg(feature = "observability")]
pub use telemetry::shutdown_tracing;
pub use telemetry::{TracingOptions, init_tracing};
