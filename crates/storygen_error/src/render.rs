//! Image rendering error types.

/// Conditions under which a scene image cannot be produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// Response contained no inline image part
    #[display("No image data found in response")]
    NoImageData,
    /// Network or endpoint failure
    #[display("Generation failed: {}", _0)]
    Generation(String),
    /// Image payload is not a well-formed base64 data URI
    #[display("Invalid image data URI: {}", _0)]
    InvalidDataUri(String),
    /// No scene with this id is on the board
    #[display("Unknown scene: {}", _0)]
    UnknownScene(String),
    /// Worker pool shut down before the job finished
    #[display("Render worker dropped the job")]
    WorkerDropped,
}

/// Image rendering error with location tracking.
///
/// # Examples
///
/// ```
/// use storygen_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::NoImageData);
/// assert_eq!(err.kind.to_string(), "No image data found in response");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new render error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
