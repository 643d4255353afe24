//! Trait definitions for the collaborators of the generation pipeline.
//!
//! The pipeline consumes two external seams: a [`TextSource`] that streams
//! model output for a prompt, and an optional [`SearchProvider`] that
//! contributes best-effort web context. Both are object-safe so callers can
//! inject stubs in tests and provider adapters in production.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{SearchProvider, TextSource, TextStream};
