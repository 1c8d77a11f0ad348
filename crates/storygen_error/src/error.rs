//! Top-level error wrapper types.

use crate::{
    AnalysisError, ChatError, ConfigError, CredentialError, GeminiError, RenderError,
    StorageError,
};

/// Every error condition a StoryGen operation can surface.
///
/// # Examples
///
/// ```
/// use storygen_error::{StorygenError, RenderError, RenderErrorKind};
///
/// let err: StorygenError = RenderError::new(RenderErrorKind::NoImageData).into();
/// assert!(format!("{}", err).contains("No image data"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StorygenErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini transport error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Script analysis error
    #[from(AnalysisError)]
    Analysis(AnalysisError),
    /// Image rendering error
    #[from(RenderError)]
    Render(RenderError),
    /// Chat assistant error
    #[from(ChatError)]
    Chat(ChatError),
    /// Credential guard error
    #[from(CredentialError)]
    Credential(CredentialError),
    /// Script input or image export error
    #[from(StorageError)]
    Storage(StorageError),
}

/// StoryGen error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("StoryGen Error: {}", _0)]
pub struct StorygenError(Box<StorygenErrorKind>);

impl StorygenError {
    /// Create a new error from a kind.
    pub fn new(kind: StorygenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StorygenErrorKind {
        &self.0
    }

    /// True when the error came from the credential guard.
    pub fn is_credential(&self) -> bool {
        matches!(self.kind(), StorygenErrorKind::Credential(_))
    }
}

// Generic From implementation for any type that converts to StorygenErrorKind
impl<T> From<T> for StorygenError
where
    T: Into<StorygenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for StoryGen operations.
pub type StorygenResult<T> = std::result::Result<T, StorygenError>;
