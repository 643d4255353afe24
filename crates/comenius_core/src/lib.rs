//! Core data types for the Comenius tutorial generation library.
//!
//! Defines the document aggregate (`Tutorial` → `Chapter` → `Section`) and
//! the tagged event stream (`TutorialEvent`) that the generation pipeline
//! multiplexes onto its output channel. The serde shapes of these types are
//! the wire contract consumed by viewers and storage collaborators.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chapter;
mod event;
mod section;
mod tutorial;

pub use chapter::Chapter;
pub use event::{
    ChapterOutline, ProgressStatus, SectionContent, SectionOutline, Stage, TutorialEvent,
};
pub use section::Section;
pub use tutorial::Tutorial;
