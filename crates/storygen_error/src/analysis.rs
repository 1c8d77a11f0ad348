//! Script analysis error types.

/// Conditions under which script segmentation fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AnalysisErrorKind {
    /// Script text is empty or whitespace
    #[display("Script is empty")]
    EmptyScript,
    /// Segmentation payload did not match the scene schema
    #[display("Failed to parse script analysis: {}", _0)]
    Parse(String),
    /// Endpoint returned no text payload
    #[display("No response from script analysis")]
    EmptyResponse,
    /// Another analysis is still running
    #[display("An analysis is already in progress")]
    InProgress,
}

/// Script analysis error with location tracking.
///
/// # Examples
///
/// ```
/// use storygen_error::{AnalysisError, AnalysisErrorKind};
///
/// let err = AnalysisError::new(AnalysisErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("No response"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Analysis Error: {} at line {} in {}", kind, line, file)]
pub struct AnalysisError {
    /// The kind of error that occurred
    pub kind: AnalysisErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AnalysisError {
    /// Create a new analysis error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AnalysisErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
