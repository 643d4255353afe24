#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! Comenius - progressive tutorial generation over streaming LLM backends.
//!
//! Comenius turns a topic into a hierarchical tutorial (chapters,
//! sections, prose content) by driving a streaming text backend through
//! three generation stages, parsing its markup output incrementally and
//! emitting every step on one ordered event stream.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use comenius::{GenerateTutorialBuilder, GenerationPipeline, ProvidersConfig};
//! use futures_util::StreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProvidersConfig::load()?;
//!     let pipeline = GenerationPipeline::new(Arc::new(config.source()?));
//!     let request = GenerateTutorialBuilder::default()
//!         .session_id("demo")
//!         .topic("给初学者的线性代数")
//!         .build()?;
//!     let mut events = std::pin::pin!(pipeline.generate(request));
//!     while let Some(event) = events.next().await {
//!         println!("{}", serde_json::to_string(&event)?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Comenius is organized as a workspace with focused crates:
//!
//! - `comenius_error` - Error types
//! - `comenius_core` - Tutorial document model and event types
//! - `comenius_interface` - `TextSource` and `SearchProvider` traits
//! - `comenius_models` - HTTP backends (Ollama, OpenAI-compatible) and
//!   provider configuration
//! - `comenius_pipeline` - The three-stage generation pipeline
//!
//! This crate (`comenius`) re-exports everything for convenience and
//! carries the CLI binary.

pub use comenius_core::{
    Chapter, ChapterOutline, ProgressStatus, Section, SectionContent, SectionOutline, Stage,
    Tutorial, TutorialEvent,
};
pub use comenius_error::{ComeniusError, ComeniusErrorKind, ComeniusResult};
pub use comenius_interface::{SearchProvider, TextSource, TextStream};
pub use comenius_models::{
    HttpTextSource, ProviderKind, ProviderSettings, ProvidersConfig, SourceBackedSearch,
};
pub use comenius_pipeline::{
    GenerateTutorial, GenerateTutorialBuilder, GenerationPipeline, RetryPolicy, SessionRegistry,
};
