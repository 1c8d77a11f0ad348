//! Mock chat assistant.

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::sync::{Arc, Mutex};
use storygen_error::{ChatError, ChatErrorKind, StorygenError, StorygenResult};
use storygen_interface::{ChatAssistant, ChatSession, TextStream};

/// How every turn of a mock session behaves.
#[derive(Debug, Clone)]
pub enum ChatBehavior {
    /// Stream these fragments, then end
    Reply(Vec<String>),
    /// Stream these fragments, then fail
    FailAfter(Vec<String>),
    /// Refuse to open the stream
    RejectTurn,
    /// Stream these fragments, then never finish
    Hang(Vec<String>),
}

#[derive(Debug, Default)]
struct ChatCounters {
    sessions: usize,
    turns: Vec<String>,
}

/// Chat assistant whose sessions replay a scripted behavior.
#[derive(Debug, Clone)]
pub struct MockChat {
    behavior: ChatBehavior,
    counters: Arc<Mutex<ChatCounters>>,
}

impl MockChat {
    pub fn new(behavior: ChatBehavior) -> Self {
        Self {
            behavior,
            counters: Arc::new(Mutex::new(ChatCounters::default())),
        }
    }

    pub fn reply(fragments: &[&str]) -> Self {
        Self::new(ChatBehavior::Reply(
            fragments.iter().map(|f| f.to_string()).collect(),
        ))
    }

    pub fn session_count(&self) -> usize {
        self.counters.lock().unwrap().sessions
    }

    /// User texts sent across all sessions.
    pub fn turns(&self) -> Vec<String> {
        self.counters.lock().unwrap().turns.clone()
    }
}

struct MockSession {
    behavior: ChatBehavior,
    counters: Arc<Mutex<ChatCounters>>,
}

#[async_trait]
impl ChatAssistant for MockChat {
    async fn create_session(&self) -> StorygenResult<Box<dyn ChatSession>> {
        self.counters.lock().unwrap().sessions += 1;
        Ok(Box::new(MockSession {
            behavior: self.behavior.clone(),
            counters: Arc::clone(&self.counters),
        }))
    }
}

fn fragments(
    items: &[String],
) -> impl futures_util::Stream<Item = StorygenResult<String>> + Send + 'static {
    stream::iter(items.to_vec().into_iter().map(Ok))
}

#[async_trait]
impl ChatSession for MockSession {
    async fn send_turn(&self, text: &str) -> StorygenResult<TextStream> {
        self.counters.lock().unwrap().turns.push(text.to_string());
        match &self.behavior {
            ChatBehavior::Reply(items) => Ok(Box::pin(fragments(items))),
            ChatBehavior::FailAfter(items) => {
                let failure: StorygenError =
                    ChatError::new(ChatErrorKind::Generation("connection reset".into())).into();
                Ok(Box::pin(
                    fragments(items).chain(stream::once(async move { Err(failure) })),
                ))
            }
            ChatBehavior::RejectTurn => {
                Err(ChatError::new(ChatErrorKind::Generation("HTTP 403".into())).into())
            }
            ChatBehavior::Hang(items) => Ok(Box::pin(fragments(items).chain(stream::pending()))),
        }
    }

    fn turn_count(&self) -> usize {
        0
    }
}
