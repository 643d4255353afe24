//! Text source provider error types.

/// Specific error conditions for backend providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// The API returned a non-success status
    #[display("API error ({}): {}", status, message)]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// The stream carried an in-band error payload
    #[display("Stream error: {}", _0)]
    StreamError(String),
    /// The configured provider name is not supported
    #[display("Unsupported provider: {}", _0)]
    UnsupportedProvider(String),
    /// The provider requires an API key and none was configured
    #[display("Missing API key for provider '{}'", _0)]
    MissingApiKey(String),
    /// The backend server could not be reached
    #[display("Server not reachable at {}", _0)]
    ServerUnreachable(String),
}

/// Error type for provider operations.
///
/// # Examples
///
/// ```
/// use comenius_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::UnsupportedProvider("acme".into()));
/// assert!(format!("{}", err).contains("acme"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
