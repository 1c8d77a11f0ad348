//! Gemini REST client shared by every capability.

use crate::CredentialStore;
use crate::gemini::dto::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::gemini::sse::SseDecoder;
use futures_util::{StreamExt, stream::Stream};
use reqwest::Client;
use std::pin::Pin;
use storygen_config::StorygenConfig;
use storygen_error::{GeminiError, GeminiErrorKind, StorygenError, StorygenResult};
use tracing::{debug, instrument, trace, warn};

/// Stream of partial responses from `streamGenerateContent`.
pub(crate) type ResponseStream =
    Pin<Box<dyn Stream<Item = StorygenResult<GenerateContentResponse>> + Send>>;

/// Gemini REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the
/// credential store.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    credentials: CredentialStore,
    base_url: String,
    analysis_model: String,
    image_model: String,
    chat_model: String,
    system_instruction: String,
}

impl GeminiClient {
    /// Creates a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all)]
    pub fn from_config(
        config: &StorygenConfig,
        credentials: CredentialStore,
    ) -> StorygenResult<Self> {
        let http = Client::builder().build().map_err(|e| {
            GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Failed to initialize HTTP client: {}",
                e
            )))
        })?;

        Ok(Self {
            http,
            credentials,
            base_url: config.api().base_url().trim_end_matches('/').to_string(),
            analysis_model: config.models().analysis().clone(),
            image_model: config.models().image().clone(),
            chat_model: config.models().chat().clone(),
            system_instruction: config.chat().system_instruction().clone(),
        })
    }

    /// Creates a client with the bundled default configuration.
    pub fn new(credentials: CredentialStore) -> StorygenResult<Self> {
        Self::from_config(&StorygenConfig::bundled()?, credentials)
    }

    /// Credential store read on every request.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Model used for script segmentation.
    pub fn analysis_model(&self) -> &str {
        &self.analysis_model
    }

    /// Model used for image synthesis.
    pub fn image_model(&self) -> &str {
        &self.image_model
    }

    /// Model used for chat.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// System instruction applied to chat sessions.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// URL of `method` on `model`.
    pub(crate) fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// Run `generateContent` and decode the full response.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> StorygenResult<GenerateContentResponse> {
        let url = self.endpoint(model, "generateContent");
        let response = self.post(&url, request).await?;

        response.json().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
                "Failed to decode response: {}",
                e
            )))
            .into()
        })
    }

    /// Run `streamGenerateContent` over SSE.
    ///
    /// Each item is one partial response. Dropping the stream closes the
    /// connection.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> StorygenResult<ResponseStream> {
        let url = format!("{}?alt=sse", self.endpoint(model, "streamGenerateContent"));
        let response = self.post(&url, request).await?;

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();
            let mut bytes = response.bytes_stream();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!(error = %e, "SSE connection failed");
                        yield Err(StorygenError::from(GeminiError::new(
                            GeminiErrorKind::StreamInterrupted(e.to_string()),
                        )));
                        return;
                    }
                };

                let events = match decoder.push(&chunk) {
                    Ok(events) => events,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                for event in events {
                    trace!(bytes = event.len(), "SSE event");
                    yield decode_event(&event);
                }
            }

            match decoder.finish() {
                Ok(Some(event)) => yield decode_event(&event),
                Ok(None) => {}
                Err(e) => yield Err(e),
            }
        };

        Ok(Box::pin(stream))
    }

    async fn post(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> StorygenResult<reqwest::Response> {
        let key = self
            .credentials
            .current()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        debug!(url = %url, "Sending Gemini API request");
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), message = %message, "Gemini API returned an error");
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        Ok(response)
    }
}

/// Decode one SSE event. An event carrying an error body fails the stream.
pub(crate) fn decode_event(event: &str) -> StorygenResult<GenerateContentResponse> {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(event) {
        let body = envelope.error;
        warn!(code = body.code, status = %body.status, "Gemini stream reported an error");
        let message = if body.status.is_empty() {
            body.message
        } else {
            format!("{} ({})", body.message, body.status)
        };
        return Err(GeminiError::new(GeminiErrorKind::StreamInterrupted(message)).into());
    }

    serde_json::from_str(event).map_err(|e| {
        GeminiError::new(GeminiErrorKind::InvalidResponse(format!(
            "Failed to decode stream event: {}",
            e
        )))
        .into()
    })
}

/// Human-readable message from an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storygen_error::StorygenErrorKind;

    #[test]
    fn endpoints_follow_model_method_layout() {
        let client = GeminiClient::new(CredentialStore::new()).unwrap();
        assert_eq!(
            client.endpoint("gemini-3-pro-preview", "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn error_body_message_is_extracted() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            api_error_message(body),
            "API key not valid. Please pass a valid API key."
        );
        assert_eq!(api_error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn stream_error_event_fails_instead_of_decoding_empty() {
        let event = r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#;

        let err = decode_event(event).unwrap_err();
        match err.kind() {
            StorygenErrorKind::Gemini(e) => assert_eq!(
                e.kind,
                GeminiErrorKind::StreamInterrupted(
                    "Internal error encountered. (INTERNAL)".to_string()
                )
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn stream_chunk_decodes() {
        let event = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Wide shot"}]}}]}"#;
        let response = decode_event(event).unwrap();
        assert_eq!(response.text().as_deref(), Some("Wide shot"));

        assert!(decode_event("not json").is_err());
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let client = GeminiClient::new(CredentialStore::new()).unwrap();
        let request = GenerateContentRequest::builder()
            .contents(vec![crate::Content::user("hi")])
            .build()
            .unwrap();

        let err = client
            .generate_content("gemini-3-pro-preview", &request)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No Gemini API key"));
    }
}
