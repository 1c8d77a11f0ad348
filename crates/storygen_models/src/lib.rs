//! Model provider integration for StoryGen.
//!
//! The Gemini backend (enabled by the default `gemini` feature) implements all
//! three capabilities the storyboard needs through a single REST client:
//!
//! - [`ScriptAnalyzer`](storygen_interface::ScriptAnalyzer) via structured JSON output
//! - [`ImageRenderer`](storygen_interface::ImageRenderer) via inline image parts
//! - [`ChatAssistant`](storygen_interface::ChatAssistant) via SSE streaming
//!
//! API keys live in a shared [`CredentialStore`]; the client reads the latest
//! key on every request, so a key selected mid-session takes effect at once.
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use storygen_config::StorygenConfig;
//! use storygen_interface::ScriptAnalyzer;
//! use storygen_models::{CredentialStore, GeminiClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StorygenConfig::load()?;
//! let credentials = CredentialStore::from_env(config.api().key_env());
//! let client = GeminiClient::from_config(&config, credentials)?;
//! let outlines = client.analyze_script("INT. COCKPIT - NIGHT\nHawke grips the controls.").await?;
//! println!("{} scenes", outlines.len());
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credentials;

pub use credentials::{ApiKey, ApiKeyGuard, CredentialStore, KeyPrompt};

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    ANALYSIS_PROMPT, Candidate, Content, GeminiChatSession, GeminiClient, GenerateContentRequest,
    GenerateContentRequestBuilder, GenerateContentResponse, GenerationConfig,
    GenerationConfigBuilder, ImageConfig, InlineData, Part, SseDecoder, analysis_prompt,
    extract_image, image_request, parse_outlines, scene_schema,
};
