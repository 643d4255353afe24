//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, OutlineError, PipelineError, ProviderError};

/// This is the foundation error enum. Each Comenius crate contributes the
/// variant for its own concern.
///
/// # Examples
///
/// ```
/// use comenius_error::{ComeniusError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: ComeniusError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ComeniusErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Outline parsing error
    #[from(OutlineError)]
    Outline(OutlineError),
    /// Backend provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Pipeline orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Comenius error with kind discrimination.
///
/// # Examples
///
/// ```
/// use comenius_error::{ComeniusResult, ConfigError};
///
/// fn might_fail() -> ComeniusResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Comenius Error: {}", _0)]
pub struct ComeniusError(Box<ComeniusErrorKind>);

impl ComeniusError {
    /// Create a new error from a kind.
    pub fn new(kind: ComeniusErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ComeniusErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ComeniusErrorKind
impl<T> From<T> for ComeniusError
where
    T: Into<ComeniusErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Comenius operations.
///
/// # Examples
///
/// ```
/// use comenius_error::{ComeniusResult, HttpError};
///
/// fn fetch_data() -> ComeniusResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type ComeniusResult<T> = std::result::Result<T, ComeniusError>;
