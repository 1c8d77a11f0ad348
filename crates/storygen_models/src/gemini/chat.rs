//! Streaming persona chat.

use crate::gemini::GeminiClient;
use crate::gemini::client::ResponseStream;
use crate::gemini::dto::{Content, GenerateContentRequest};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::sync::{Arc, RwLock};
use storygen_error::{
    ChatError, ChatErrorKind, GeminiError, GeminiErrorKind, StorygenError, StorygenResult,
};
use storygen_interface::{ChatAssistant, ChatSession, TextStream};
use tracing::{debug, info, instrument, warn};

/// A Gemini chat conversation.
///
/// History holds only completed exchanges; a turn whose stream fails or is
/// dropped early leaves it untouched.
#[derive(Debug, Clone)]
pub struct GeminiChatSession {
    client: GeminiClient,
    system_instruction: Content,
    history: Arc<RwLock<Vec<Content>>>,
}

impl GeminiChatSession {
    /// Fresh session using the client's chat model and persona.
    pub fn new(client: GeminiClient) -> Self {
        let system_instruction = Content::system(client.system_instruction());
        Self {
            client,
            system_instruction,
            history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Copy of the committed history.
    pub fn history(&self) -> Vec<Content> {
        self.history
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn request_for(&self, user: &Content) -> StorygenResult<GenerateContentRequest> {
        let mut contents = self.history();
        contents.push(user.clone());

        Ok(GenerateContentRequest::builder()
            .contents(contents)
            .system_instruction(self.system_instruction.clone())
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::Builder(e.to_string())))?)
    }
}

fn chat_failure(err: StorygenError) -> StorygenError {
    ChatError::new(ChatErrorKind::Generation(err.to_string())).into()
}

/// Forward reply fragments from `responses`, committing the exchange to
/// `history` only once the stream has ended cleanly.
fn reply_stream(
    mut responses: ResponseStream,
    user: Content,
    history: Arc<RwLock<Vec<Content>>>,
) -> TextStream {
    let stream = async_stream::stream! {
        let mut reply = String::new();

        while let Some(response) = responses.next().await {
            match response {
                Ok(response) => {
                    if let Some(fragment) = response.text() {
                        reply.push_str(&fragment);
                        yield Ok(fragment);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Chat stream failed");
                    yield Err(chat_failure(e));
                    return;
                }
            }
        }

        let mut history = history.write().unwrap_or_else(|e| e.into_inner());
        history.push(user);
        history.push(Content::model(reply));
        info!(turns = history.len() / 2, "Chat turn committed");
    };

    Box::pin(stream)
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    #[instrument(skip(self, text), fields(model = %self.client.chat_model(), chars = text.len()))]
    async fn send_turn(&self, text: &str) -> StorygenResult<TextStream> {
        if text.trim().is_empty() {
            return Err(ChatError::new(ChatErrorKind::EmptyMessage).into());
        }

        let user = Content::user(text);
        let request = self.request_for(&user)?;
        let responses = self
            .client
            .stream_generate_content(self.client.chat_model(), &request)
            .await
            .map_err(chat_failure)?;
        debug!("Chat stream opened");

        Ok(reply_stream(responses, user, Arc::clone(&self.history)))
    }

    fn turn_count(&self) -> usize {
        self.history.read().unwrap_or_else(|e| e.into_inner()).len() / 2
    }
}

#[async_trait]
impl ChatAssistant for GeminiClient {
    async fn create_session(&self) -> StorygenResult<Box<dyn ChatSession>> {
        Ok(Box::new(GeminiChatSession::new(self.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialStore;
    use crate::gemini::dto::GenerateContentResponse;

    #[test]
    fn request_replays_history_before_new_turn() {
        let session = GeminiChatSession::new(GeminiClient::new(CredentialStore::new()).unwrap());
        {
            let mut history = session.history.write().unwrap();
            history.push(Content::user("What lens for the cockpit?"));
            history.push(Content::model("A 35mm keeps the console in frame."));
        }

        let request = session.request_for(&Content::user("And for the jungle?")).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "And for the jungle?");
        assert!(
            json["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("You are an expert film production assistant")
        );
        assert_eq!(session.turn_count(), 1);
    }

    #[tokio::test]
    async fn failed_open_leaves_history_empty() {
        let session = GeminiChatSession::new(GeminiClient::new(CredentialStore::new()).unwrap());

        let err = session.send_turn("Hello").await.err().unwrap();
        assert!(err.to_string().contains("Chat generation failed"));
        assert_eq!(session.turn_count(), 0);
    }

    fn chunk(text: &str) -> StorygenResult<GenerateContentResponse> {
        Ok(serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        }))
        .unwrap())
    }

    fn canned(items: Vec<StorygenResult<GenerateContentResponse>>) -> ResponseStream {
        Box::pin(futures_util::stream::iter(items))
    }

    #[tokio::test]
    async fn completed_stream_commits_full_reply() {
        let session = GeminiChatSession::new(GeminiClient::new(CredentialStore::new()).unwrap());
        let stream = reply_stream(
            canned(vec![chunk("Try a "), chunk("crane shot.")]),
            Content::user("How do I open the jungle scene?"),
            Arc::clone(&session.history),
        );

        let fragments: Vec<String> = stream.map(|item| item.unwrap()).collect().await;

        assert_eq!(fragments, vec!["Try a ", "crane shot."]);
        assert_eq!(session.turn_count(), 1);
        let history = session.history();
        assert_eq!(history[0].visible_text(), "How do I open the jungle scene?");
        assert_eq!(history[1].role().as_deref(), Some("model"));
        assert_eq!(history[1].visible_text(), "Try a crane shot.");
    }

    #[tokio::test]
    async fn interrupted_stream_is_not_committed() {
        let session = GeminiChatSession::new(GeminiClient::new(CredentialStore::new()).unwrap());
        let interruption: StorygenError =
            GeminiError::new(GeminiErrorKind::StreamInterrupted("connection reset".to_string()))
                .into();
        let stream = reply_stream(
            canned(vec![chunk("Try a "), Err(interruption)]),
            Content::user("How do I open the jungle scene?"),
            Arc::clone(&session.history),
        );

        let items: Vec<StorygenResult<String>> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().ok(), Some("Try a "));
        assert_eq!(items.iter().filter(|item| item.is_err()).count(), 1);
        let err = items[1].as_ref().unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(session.turn_count(), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let session = GeminiChatSession::new(GeminiClient::new(CredentialStore::new()).unwrap());
        let err = session.send_turn("   ").await.err().unwrap();
        assert!(err.to_string().contains("Chat message is empty"));
    }
}
