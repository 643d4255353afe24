//! Text source backends for Comenius.
//!
//! Implements the [`comenius_interface::TextSource`] seam over HTTP for two
//! wire formats: the Ollama NDJSON generate API and the OpenAI-compatible
//! chat-completions SSE API (OpenAI, DeepSeek, OpenRouter). Each provider
//! contributes a [`WireProtocol`] describing its endpoint, headers, payload,
//! and stream-fragment parsing; one [`HttpTextSource`] drives any of them.
//! Providers are selected by configuration, never by type inspection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod ollama;
mod openai;
mod protocol;
mod search;

pub use client::HttpTextSource;
pub use config::{ProviderKind, ProviderSettings, ProvidersConfig};
pub use ollama::OllamaProtocol;
pub use openai::OpenAiChatProtocol;
pub use protocol::{Fragment, WireProtocol};
pub use search::SourceBackedSearch;
