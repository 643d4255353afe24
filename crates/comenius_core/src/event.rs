//! Tagged events emitted by the generation pipeline.

use crate::{Chapter, Section};
use serde::{Deserialize, Serialize};

/// Pipeline stage names, as carried by progress events.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Stage A: chapter outline
    Chapters,
    /// Stage B: section outline per chapter
    Sections,
    /// Stage C: content per section
    Content,
}

/// Progress milestone status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgressStatus {
    /// The stage is starting
    Start,
    /// The stage finished all its units
    Complete,
}

/// Structured payload of a `chapter` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterOutline {
    /// Declared chapter number
    pub number: u32,
    /// Chapter title
    pub title: String,
    /// Chapter description
    pub description: String,
}

impl From<&Chapter> for ChapterOutline {
    fn from(chapter: &Chapter) -> Self {
        Self {
            number: chapter.number,
            title: chapter.title.clone(),
            description: chapter.description.clone(),
        }
    }
}

/// Structured payload of a `section` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOutline {
    /// Owning chapter number
    pub chapter: u32,
    /// Dotted section number
    pub number: String,
    /// Section title
    pub title: String,
    /// Section description
    pub description: String,
}

impl SectionOutline {
    /// Build the payload for a section under a given chapter.
    pub fn new(chapter: u32, section: &Section) -> Self {
        Self {
            chapter,
            number: section.number.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
        }
    }
}

/// Structured payload of a `content` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionContent {
    /// Owning chapter number
    pub chapter: u32,
    /// Dotted section number
    pub section: String,
    /// Full accumulated prose for the section
    pub content: String,
}

/// One emission on the pipeline's single ordered output channel.
///
/// Exactly one of `Stopped`, `Error`, or `Complete` ends each run, always
/// last. All `Chunk` events of a prompt call precede the structured-unit
/// events derived from that call's accumulated text.
///
/// # Examples
///
/// ```
/// use comenius_core::TutorialEvent;
///
/// let event = TutorialEvent::Chunk { content: "# 第1章".into() };
/// let json = serde_json::to_string(&event).unwrap();
/// assert!(json.contains(r#""type":"chunk""#));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TutorialEvent {
    /// Raw text fragment, forwarded unchanged from the text source
    Chunk {
        /// Fragment text
        content: String,
    },
    /// A chapter parsed from the chapter stage
    Chapter {
        /// Chapter payload
        data: ChapterOutline,
    },
    /// A section parsed from the section stage
    Section {
        /// Section payload
        data: SectionOutline,
    },
    /// A section's full content from the content stage
    Content {
        /// Content payload
        data: SectionContent,
    },
    /// Stage progress milestone
    Progress {
        /// Stage name
        stage: Stage,
        /// Start or complete
        status: ProgressStatus,
        /// Unit count, present on completion
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<usize>,
    },
    /// Free-text informational notice
    Info {
        /// Notice text
        message: String,
    },
    /// Cancellation acknowledged; terminal
    Stopped,
    /// Terminal failure
    Error {
        /// Human-readable failure message
        message: String,
    },
    /// Terminal success
    Complete {
        /// Completion message
        message: String,
    },
}

impl TutorialEvent {
    /// Whether this event terminates the run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Stopped | Self::Error { .. } | Self::Complete { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_omits_absent_count() {
        let event = TutorialEvent::Progress {
            stage: Stage::Chapters,
            status: ProgressStatus::Start,
            count: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("count"));
        assert!(json.contains(r#""stage":"chapters""#));
        assert!(json.contains(r#""status":"start""#));
    }

    #[test]
    fn content_event_wire_shape() {
        let event = TutorialEvent::Content {
            data: SectionContent {
                chapter: 1,
                section: "1.1".into(),
                content: "prose".into(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "content");
        assert_eq!(json["data"]["chapter"], 1);
        assert_eq!(json["data"]["section"], "1.1");
    }

    #[test]
    fn terminal_classification() {
        assert!(TutorialEvent::Stopped.is_terminal());
        assert!(
            !TutorialEvent::Chunk {
                content: String::new()
            }
            .is_terminal()
        );
    }

    #[test]
    fn stage_displays_lowercase() {
        assert_eq!(Stage::Chapters.to_string(), "chapters");
        assert_eq!(Stage::Content.to_string(), "content");
    }
}
