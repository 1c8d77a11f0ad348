//! Gemini transport error types.

/// Gemini-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// No API key is available to the client
    #[display("No Gemini API key has been selected")]
    MissingApiKey,
    /// Request could not be sent or the connection failed
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// Endpoint answered with a non-success status
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message or response body
        message: String,
    },
    /// Response body did not match the expected shape
    #[display("Invalid Gemini response: {}", _0)]
    InvalidResponse(String),
    /// Request body could not be assembled
    #[display("Failed to build request: {}", _0)]
    Builder(String),
    /// Streaming response broke off before completion
    #[display("Stream interrupted: {}", _0)]
    StreamInterrupted(String),
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use storygen_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::HttpError {
///     status_code: 403,
///     message: "API key not valid".to_string(),
/// });
/// assert!(err.to_string().contains("HTTP 403 error: API key not valid"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
