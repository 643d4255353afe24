//! Tutorial document aggregate.

use crate::{Chapter, Section};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The tutorial document: an ordered list of chapters.
///
/// Partially populated tutorials are valid pipeline inputs; the orchestrator
/// detects per chapter and per section which work is already done and skips
/// only that unit.
///
/// # Examples
///
/// ```
/// use comenius_core::{Chapter, Tutorial};
///
/// let tutorial = Tutorial::new(vec![Chapter::new(1, "第1章 向量", "")]);
/// assert!(!tutorial.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tutorial {
    /// Chapters in generation order
    pub chapters: Vec<Chapter>,
}

impl Tutorial {
    /// Create a tutorial from existing chapters.
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }

    /// A tutorial is complete iff every chapter has at least one section and
    /// every section has non-empty content.
    pub fn is_complete(&self) -> bool {
        !self.chapters.is_empty() && self.chapters.iter().all(Chapter::is_complete)
    }

    /// Render the context snapshot: a titles-only projection of the document
    /// so far, fed into later prompts. Descriptions and content are omitted.
    pub fn outline_snapshot(&self) -> String {
        let mut out = String::new();
        for chapter in &self.chapters {
            let _ = writeln!(out, "# {}", chapter.title);
            for section in &chapter.sections {
                let _ = writeln!(out, "## {} {}", section.number, section.title);
            }
        }
        out
    }

    /// Look up a section by chapter number and dotted section number.
    pub fn section_mut(&mut self, chapter: u32, number: &str) -> Option<&mut Section> {
        self.chapters
            .iter_mut()
            .find(|c| c.number == chapter)?
            .sections
            .iter_mut()
            .find(|s| s.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tutorial {
        let mut chapter = Chapter::new(1, "第1章 向量", "intro");
        chapter.sections.push(Section::new("1.1", "标量与向量", "d"));
        Tutorial::new(vec![chapter])
    }

    #[test]
    fn empty_tutorial_is_incomplete() {
        assert!(!Tutorial::default().is_complete());
    }

    #[test]
    fn completeness_requires_section_content() {
        let mut tutorial = sample();
        assert!(!tutorial.is_complete());
        tutorial.section_mut(1, "1.1").unwrap().content = "prose".into();
        assert!(tutorial.is_complete());
    }

    #[test]
    fn snapshot_carries_titles_only() {
        let tutorial = sample();
        let snapshot = tutorial.outline_snapshot();
        assert!(snapshot.contains("# 第1章 向量"));
        assert!(snapshot.contains("## 1.1 标量与向量"));
        assert!(!snapshot.contains("intro"));
    }

    #[test]
    fn wire_shape_is_nested_chapters_and_sections() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["chapters"][0]["number"], 1);
        assert_eq!(json["chapters"][0]["sections"][0]["number"], "1.1");
        assert_eq!(json["chapters"][0]["sections"][0]["content"], "");
    }
}
