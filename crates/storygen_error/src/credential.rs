//! Credential guard error types.

/// Reasons the credential guard refuses access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CredentialErrorKind {
    /// No API credential is selected
    #[display("An API key is required before using the model endpoints")]
    Missing,
    /// Selection finished but the credential is still absent
    #[display("API key selection did not produce a usable key")]
    Rejected,
    /// The selection prompt itself failed
    #[display("Failed to select API key: {}", _0)]
    Prompt(String),
}

/// Credential error with location tracking.
///
/// # Examples
///
/// ```
/// use storygen_error::{CredentialError, CredentialErrorKind};
///
/// let err = CredentialError::new(CredentialErrorKind::Missing);
/// assert!(format!("{}", err).contains("API key is required"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Credential Error: {} at line {} in {}", kind, line, file)]
pub struct CredentialError {
    /// The kind of error that occurred
    pub kind: CredentialErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CredentialError {
    /// Create a new credential error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CredentialErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
