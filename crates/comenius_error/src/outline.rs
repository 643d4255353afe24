//! Outline parsing error types.

/// Specific error conditions for outline parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OutlineErrorKind {
    /// No well-formed entities were recognized in the blob.
    ///
    /// Carries the raw accumulated text so callers can log it for
    /// diagnostics before retrying the stage.
    #[display("No well-formed headings recognized in {} bytes of output", _0.len())]
    NoEntities(String),
}

/// Error type for outline parsing operations.
///
/// # Examples
///
/// ```
/// use comenius_error::{OutlineError, OutlineErrorKind};
///
/// let err = OutlineError::new(OutlineErrorKind::NoEntities(String::new()));
/// assert!(format!("{}", err).contains("No well-formed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Outline Error: {} at line {} in {}", kind, line, file)]
pub struct OutlineError {
    /// The specific error condition
    pub kind: OutlineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl OutlineError {
    /// Create a new OutlineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OutlineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
