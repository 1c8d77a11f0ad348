//! Storage error types for script input and image export.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the export directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// File contents are not valid UTF-8 text
    #[display("File is not valid UTF-8 text: {}", _0)]
    InvalidText(String),
    /// Scene has no finished image to export
    #[display("Scene {} has no generated image", _0)]
    NoImage(u32),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use storygen_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NoImage(3));
/// assert!(format!("{}", err).contains("Scene 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
