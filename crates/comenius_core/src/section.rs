//! Section entity.

use serde::{Deserialize, Serialize};

/// A single section within a chapter.
///
/// `number` is dotted (e.g. `"1.1"`); its leading component always equals
/// the owning chapter's number, enforced at parse time. `content` is empty
/// until the content stage fills it, exactly once.
///
/// # Examples
///
/// ```
/// use comenius_core::Section;
///
/// let section = Section::new("1.1", "标量与向量", "basic definitions");
/// assert!(!section.has_content());
/// assert_eq!(section.chapter_number(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Dotted section number, e.g. "1.1"
    pub number: String,
    /// Section title
    pub title: String,
    /// Section description from the outline stage
    pub description: String,
    /// Full prose content, empty until the content stage completes
    #[serde(default)]
    pub content: String,
}

impl Section {
    /// Create a section with empty content.
    pub fn new(
        number: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            description: description.into(),
            content: String::new(),
        }
    }

    /// Whether the content stage has filled this section.
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// The chapter component of the dotted number, if it parses.
    pub fn chapter_number(&self) -> Option<u32> {
        self.number.split('.').next()?.parse().ok()
    }
}
