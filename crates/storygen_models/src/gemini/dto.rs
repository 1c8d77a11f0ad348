//! Gemini `generateContent` wire types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storygen_core::ImageSize;

/// Inline binary payload, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type reported by the model
    #[serde(default)]
    mime_type: String,
    /// Base64 payload
    data: String,
}

/// One part of a content turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Binary content
    #[serde(default, alias = "inline_data", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    /// Set on reasoning summaries, which are never shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

impl Part {
    /// Text-only part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// True for reasoning summaries.
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// A turn of conversation or a system instruction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct Content {
    /// `user` or `model`; absent on system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Ordered parts
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    /// Single-text user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::from_text(text)],
        }
    }

    /// Single-text model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some("model".to_string()),
            parts: vec![Part::from_text(text)],
        }
    }

    /// System instruction content.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::from_text(text)],
        }
    }

    /// Concatenated visible text of all parts, skipping reasoning summaries.
    pub fn visible_text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| !p.is_thought())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// Output resolution and framing for image models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Resolution tier
    image_size: ImageSize,
    /// Aspect ratio such as `16:9`
    aspect_ratio: String,
}

impl ImageConfig {
    /// Config for `size` at `aspect_ratio`.
    pub fn new(size: ImageSize, aspect_ratio: impl Into<String>) -> Self {
        Self {
            image_size: size,
            aspect_ratio: aspect_ratio.into(),
        }
    }
}

/// Generation parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into, strip_option), default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type the model must answer with
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    /// OpenAPI-style schema constraining JSON output
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    /// Image output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// Creates a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder::default()
    }
}

/// Body of `generateContent` and `streamGenerateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation so far, ending with the new user turn
    contents: Vec<Content>,
    /// Persona applied to the whole conversation
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    /// Output constraints
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Creates a new builder for `GenerateContentRequest`.
    pub fn builder() -> GenerateContentRequestBuilder {
        GenerateContentRequestBuilder::default()
    }
}

/// One generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when the candidate was blocked
    #[serde(default)]
    content: Option<Content>,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Response of `generateContent`, or one SSE event of `streamGenerateContent`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidates, usually exactly one
    #[serde(default)]
    candidates: Vec<Candidate>,
    /// Safety feedback on the prompt
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

impl GenerateContentResponse {
    /// Content of the first candidate.
    pub fn first_content(&self) -> Option<&Content> {
        self.candidates.first().and_then(|c| c.content.as_ref())
    }

    /// Visible text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        self.first_content()
            .map(Content::visible_text)
            .filter(|t| !t.is_empty())
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub(crate) error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) code: u16,
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) status: String,
}
