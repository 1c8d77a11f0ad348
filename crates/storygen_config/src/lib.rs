//! Layered configuration for the StoryGen storyboard toolkit.
//!
//! Configuration is assembled from:
//! - Bundled defaults (include_str! from storygen.toml)
//! - User overrides (~/.config/storygen/storygen.toml, then ./storygen.toml)
//!
//! Later sources override earlier ones key by key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;

pub use settings::{
    ApiSettings, ChatSettings, DEFAULT_CONFIG, ExportSettings, ModelSettings, RenderSettings,
    StorygenConfig,
};
