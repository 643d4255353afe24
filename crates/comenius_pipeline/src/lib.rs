#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! Progressive tutorial generation for Comenius.
//!
//! The pipeline turns a topic into a hierarchical tutorial document by
//! driving a streaming text source through three stages: chapter
//! outline, section outline per chapter, prose content per section.
//! Model output is parsed incrementally by the line-oriented grammar in
//! [`outline`]; failed units retry under a [`RetryPolicy`]; running
//! sessions are cancelled cooperatively through a [`SessionRegistry`].
//!
//! Everything a run emits travels on one ordered
//! [`TutorialEvent`](comenius_core::TutorialEvent) stream returned by
//! [`GenerationPipeline::generate`].

mod accumulator;
pub mod outline;
mod pipeline;
pub mod prompts;
mod registry;
mod retry;

pub use accumulator::StreamAccumulator;
pub use pipeline::{
    GenerateTutorial, GenerateTutorialBuilder, GenerateTutorialBuilderError, GenerationPipeline,
};
pub use registry::SessionRegistry;
pub use retry::RetryPolicy;
