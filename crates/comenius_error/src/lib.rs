//! Error types for the Comenius library.
//!
//! This crate provides the foundation error types used throughout the
//! Comenius ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use comenius_error::{ComeniusResult, HttpError};
//!
//! fn fetch_data() -> ComeniusResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod outline;
mod pipeline;
mod provider;

pub use config::ConfigError;
pub use error::{ComeniusError, ComeniusErrorKind, ComeniusResult};
pub use http::HttpError;
pub use outline::{OutlineError, OutlineErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
