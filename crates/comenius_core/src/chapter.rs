//! Chapter entity.

use crate::Section;
use serde::{Deserialize, Serialize};

/// A top-level chapter of a tutorial.
///
/// The declared chapter number from the model output is trusted as-is, not
/// re-sequenced. Sections are attached by the orchestrator after the section
/// outline stage for this chapter succeeds.
///
/// # Examples
///
/// ```
/// use comenius_core::Chapter;
///
/// let chapter = Chapter::new(1, "第1章 向量", "introduces vectors");
/// assert!(!chapter.is_outlined());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Declared chapter number (positive)
    pub number: u32,
    /// Chapter title, including the designator, e.g. "第1章 向量"
    pub title: String,
    /// Chapter description from the outline stage
    pub description: String,
    /// Sections, empty until the section stage runs for this chapter
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Chapter {
    /// Create a chapter with no sections.
    pub fn new(number: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            description: description.into(),
            sections: Vec::new(),
        }
    }

    /// Whether the section stage has populated this chapter.
    pub fn is_outlined(&self) -> bool {
        !self.sections.is_empty()
    }

    /// Whether every section of this chapter has non-empty content.
    pub fn is_complete(&self) -> bool {
        self.is_outlined() && self.sections.iter().all(Section::has_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chapter_is_neither_outlined_nor_complete() {
        let chapter = Chapter::new(1, "第1章 向量", "");
        assert!(!chapter.is_outlined());
        assert!(!chapter.is_complete());
    }

    #[test]
    fn outlined_chapter_without_content_is_incomplete() {
        let mut chapter = Chapter::new(1, "第1章 向量", "");
        chapter.sections.push(Section::new("1.1", "t", "d"));
        assert!(chapter.is_outlined());
        assert!(!chapter.is_complete());
    }
}
