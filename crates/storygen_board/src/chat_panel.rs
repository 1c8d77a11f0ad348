//! Chat transcript state and streaming turns.

use crate::CredentialGate;
use futures_util::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use storygen_core::{ChatMessage, MessageId};
use storygen_error::{ChatError, ChatErrorKind, StorygenResult};
use storygen_interface::{ChatAssistant, ChatSession};
use tokio::sync::{OnceCell, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{Instrument, debug, info, info_span, warn};

/// Text of the terminal message shown when a turn fails.
pub const CHAT_ERROR_MESSAGE: &str = "I'm sorry, I encountered an error processing your request. Please ensure your API key is valid.";

/// How a chat turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply streamed to the end
    Completed,
    /// The turn failed; an error message was appended
    Failed,
    /// The turn was abandoned before it finished
    Abandoned,
}

/// Handle on a running chat turn.
#[derive(Debug)]
pub struct ChatTurn {
    task: JoinHandle<TurnOutcome>,
}

impl ChatTurn {
    /// Wait for the turn to end.
    pub async fn join(self) -> TurnOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => TurnOutcome::Abandoned,
            Err(e) => {
                warn!(error = %e, "Chat turn task failed");
                TurnOutcome::Failed
            }
        }
    }
}

/// The chat assistant panel.
///
/// One session is created on the first turn and reused for the panel's
/// lifetime. Turns run one at a time. Clones share state.
#[derive(Clone)]
pub struct ChatPanel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    assistant: Arc<dyn ChatAssistant>,
    gate: CredentialGate,
    session: OnceCell<Box<dyn ChatSession>>,
    transcript: watch::Sender<Arc<Vec<ChatMessage>>>,
    busy: AtomicBool,
    current: Mutex<Option<AbortHandle>>,
}

/// Clears the busy flag when the turn ends, however it ends.
struct BusyFlag(Arc<PanelInner>);

impl Drop for BusyFlag {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::SeqCst);
    }
}

impl ChatPanel {
    /// Panel whose transcript opens with `greeting`.
    pub fn new(
        assistant: Arc<dyn ChatAssistant>,
        gate: CredentialGate,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                assistant,
                gate,
                session: OnceCell::new(),
                transcript: watch::Sender::new(Arc::new(vec![ChatMessage::model(greeting)])),
                busy: AtomicBool::new(false),
                current: Mutex::new(None),
            }),
        }
    }

    /// Current transcript.
    pub fn transcript(&self) -> Arc<Vec<ChatMessage>> {
        self.inner.transcript.borrow().clone()
    }

    /// Watch the transcript.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<ChatMessage>>> {
        self.inner.transcript.subscribe()
    }

    /// True while a turn is running.
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::SeqCst)
    }

    /// Send `text` as a user turn.
    ///
    /// The user message is appended immediately. Once the reply stream opens
    /// a single model message is appended and grows with every fragment. If
    /// the turn fails, [`CHAT_ERROR_MESSAGE`] is appended instead and any
    /// partial reply stays.
    ///
    /// # Errors
    ///
    /// Fails without touching the transcript when the text is blank, the
    /// credential gate is closed, or another turn is still running.
    pub async fn send(&self, text: &str) -> StorygenResult<ChatTurn> {
        if text.trim().is_empty() {
            return Err(ChatError::new(ChatErrorKind::EmptyMessage).into());
        }
        self.inner.gate.require()?;
        if self.inner.busy.swap(true, Ordering::SeqCst) {
            return Err(ChatError::new(ChatErrorKind::TurnInProgress).into());
        }
        let flag = BusyFlag(Arc::clone(&self.inner));

        self.inner.push(ChatMessage::user(text));

        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        let span = info_span!("chat_turn", chars = text.len());
        let task = tokio::spawn(
            async move {
                let _flag = flag;
                inner.run_turn(&text).await
            }
            .instrument(span),
        );

        *self.inner.lock_current() = Some(task.abort_handle());
        Ok(ChatTurn { task })
    }

    /// Abort the running turn, keeping whatever text already arrived.
    ///
    /// Returns false when no turn was running.
    pub fn abandon(&self) -> bool {
        match self.inner.lock_current().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                info!("Chat turn abandoned");
                true
            }
            _ => false,
        }
    }
}

impl PanelInner {
    async fn run_turn(&self, text: &str) -> TurnOutcome {
        let session = match self
            .session
            .get_or_try_init(|| self.assistant.create_session())
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Chat session could not be created");
                self.push(ChatMessage::model(CHAT_ERROR_MESSAGE));
                return TurnOutcome::Failed;
            }
        };

        let mut stream = match session.send_turn(text).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Chat turn rejected");
                self.push(ChatMessage::model(CHAT_ERROR_MESSAGE));
                return TurnOutcome::Failed;
            }
        };

        let reply = self.push(ChatMessage::model(""));
        let mut fragments = 0usize;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    fragments += 1;
                    self.append(reply, &fragment);
                }
                Err(e) => {
                    warn!(error = %e, fragments, "Chat stream failed");
                    self.push(ChatMessage::model(CHAT_ERROR_MESSAGE));
                    return TurnOutcome::Failed;
                }
            }
        }

        debug!(fragments, "Chat reply complete");
        TurnOutcome::Completed
    }

    fn push(&self, message: ChatMessage) -> MessageId {
        let id = message.id;
        self.transcript
            .send_modify(|messages| Arc::make_mut(messages).push(message));
        id
    }

    fn append(&self, id: MessageId, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        self.transcript.send_if_modified(|messages| {
            let Some(index) = messages.iter().rposition(|m| m.id == id) else {
                return false;
            };
            Arc::make_mut(messages)[index].append(fragment);
            true
        });
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ChatPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatPanel")
            .field("messages", &self.inner.transcript.borrow().len())
            .field("busy", &self.is_busy())
            .field("gate", &self.inner.gate)
            .finish_non_exhaustive()
    }
}
