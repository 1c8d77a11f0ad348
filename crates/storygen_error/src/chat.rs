//! Chat assistant error types.

/// Conditions under which a chat turn fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ChatErrorKind {
    /// Network or endpoint failure while streaming
    #[display("Chat generation failed: {}", _0)]
    Generation(String),
    /// A previous turn is still streaming
    #[display("A chat response is still being received")]
    TurnInProgress,
    /// Message text is empty or whitespace
    #[display("Chat message is empty")]
    EmptyMessage,
}

/// Chat error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Chat Error: {} at line {} in {}", kind, line, file)]
pub struct ChatError {
    /// The kind of error that occurred
    pub kind: ChatErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ChatError {
    /// Create a new chat error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ChatErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
