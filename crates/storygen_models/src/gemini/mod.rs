//! Google Gemini REST backend.
//!
//! One [`GeminiClient`] serves every capability:
//! - script segmentation with a JSON response schema (`analysis`)
//! - 16:9 image synthesis with a resolution tier (`image`)
//! - persona chat over `streamGenerateContent?alt=sse` (`chat`)

mod analysis;
mod chat;
mod client;
mod dto;
mod image;
mod sse;

pub use analysis::{ANALYSIS_PROMPT, analysis_prompt, parse_outlines, scene_schema};
pub use chat::GeminiChatSession;
pub use client::GeminiClient;
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentRequestBuilder,
    GenerateContentResponse, GenerationConfig, GenerationConfigBuilder, ImageConfig, InlineData,
    Part,
};
pub use image::{extract_image, image_request};
pub use sse::SseDecoder;
