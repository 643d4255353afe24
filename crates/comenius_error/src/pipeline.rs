//! Generation pipeline error types.

/// Specific error conditions for pipeline orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Stage A finished with a structurally valid but empty chapter list
    #[display("Chapter stage produced an empty chapter list")]
    EmptyChapters,
    /// The retry policy ran out of attempts for a stage unit
    #[display("Stage '{}' exhausted {} attempts", stage, attempts)]
    RetriesExhausted {
        /// Stage that gave up
        stage: String,
        /// Attempts consumed
        attempts: u32,
    },
    /// A session with this identifier is already running
    #[display("Session '{}' is already active", _0)]
    SessionActive(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use comenius_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::EmptyChapters);
/// assert!(format!("{}", err).contains("empty chapter list"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
