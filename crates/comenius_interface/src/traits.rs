//! Trait definitions for text backends and context providers.

use async_trait::async_trait;
use comenius_error::ComeniusResult;
use futures_util::stream::Stream;
use std::pin::Pin;

/// A stream of raw text fragments from a backend.
///
/// Fragments arrive in generation order and are never re-ordered or batched
/// across calls. The stream terminates normally at end of generation or with
/// an error item on transport failure.
pub type TextStream = Pin<Box<dyn Stream<Item = ComeniusResult<String>> + Send>>;

/// Core trait for text-generating backends.
///
/// Each call is independent: the pipeline builds a fresh prompt per stage
/// unit and never holds conversation state inside the source.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Stream model output for a single prompt.
    async fn stream_text(&self, prompt: &str) -> ComeniusResult<TextStream>;

    /// Provider name (e.g. "ollama", "openai", "deepseek").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g. "deepseek-r1:8b").
    fn model_name(&self) -> &str;
}

/// Best-effort external context provider.
///
/// Failures and empty results must not abort a pipeline run; the caller
/// degrades to "no external context" and proceeds.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Produce a textual summary of web results for a query.
    async fn search(&self, query: &str) -> ComeniusResult<String>;
}
