//! Line-oriented parsing of model output into outline entities.
//!
//! The model is instructed to emit one of two heading grammars plus
//! angle-bracket description lines:
//!
//! ```text
//! # 第1章 向量
//! <introduces vectors and their geometry>
//! ## 1.1 向量的定义
//! <defines vectors formally>
//! ```
//!
//! Models do not always comply.  Malformed heading lines are logged and
//! skipped rather than failing the whole blob; a blob that yields no
//! entities at all is an error the caller turns into a retry.

use comenius_core::{Chapter, Section};
use comenius_error::{ComeniusResult, OutlineError, OutlineErrorKind};

/// A heading grammar the shared line scanner can drive.
trait Grammar {
    /// The entity a well-formed heading opens.
    type Entity;

    /// Heading marker, including the trailing space.
    fn prefix(&self) -> &'static str;

    /// Parses the text after the marker.  `None` means the heading is
    /// malformed and the line should be skipped.
    fn open(&self, rest: &str) -> Option<Self::Entity>;

    /// Attaches a description line to the currently open entity.
    /// Later descriptions overwrite earlier ones.
    fn describe(entity: &mut Self::Entity, description: &str);
}

/// `# 第N章 标题` headings.
struct ChapterGrammar;

impl Grammar for ChapterGrammar {
    type Entity = Chapter;

    fn prefix(&self) -> &'static str {
        "# "
    }

    fn open(&self, rest: &str) -> Option<Chapter> {
        let rest = rest.trim();
        let body = rest.strip_prefix('第')?;
        let marker = body.find('章')?;
        let designator = body[..marker].trim();
        let number: u32 = match designator.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(designator, "skipping chapter heading with bad designator");
                return None;
            }
        };
        let title_part = body[marker + '章'.len_utf8()..].trim();
        if title_part.is_empty() {
            tracing::warn!(number, "skipping chapter heading with empty title");
            return None;
        }
        let title = format!("第{designator}章 {title_part}");
        Some(Chapter::new(number, title, String::new()))
    }

    fn describe(entity: &mut Chapter, description: &str) {
        entity.description = description.to_owned();
    }
}

/// `## n.m 标题` headings, validated against the owning chapter.
struct SectionGrammar {
    chapter: u32,
}

impl Grammar for SectionGrammar {
    type Entity = Section;

    fn prefix(&self) -> &'static str {
        "## "
    }

    fn open(&self, rest: &str) -> Option<Section> {
        let rest = rest.trim();
        let (number, title) = rest.split_once(char::is_whitespace)?;
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let (major, _) = number.split_once('.')?;
        if major.parse::<u32>() != Ok(self.chapter) {
            tracing::warn!(
                number,
                chapter = self.chapter,
                "skipping section numbered under a different chapter"
            );
            return None;
        }
        Some(Section::new(number, title, String::new()))
    }

    fn describe(entity: &mut Section, description: &str) {
        entity.description = description.to_owned();
    }
}

/// Single-pass scanner shared by both grammars.
///
/// A well-formed heading flushes the previously open entity and opens a
/// new one.  A malformed heading leaves the scanner state untouched.
/// `<...>` lines describe the open entity; anything else is ignored.
fn scan<G: Grammar>(grammar: &G, blob: &str) -> Vec<G::Entity> {
    let mut entities = Vec::new();
    let mut open: Option<G::Entity> = None;
    for raw in blob.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(grammar.prefix()) {
            match grammar.open(rest) {
                Some(entity) => {
                    if let Some(done) = open.take() {
                        entities.push(done);
                    }
                    open = Some(entity);
                }
                None => {
                    tracing::warn!(line, "skipping malformed heading");
                }
            }
            continue;
        }
        if line.starts_with('#') {
            // The other grammar's heading, or noise like "###".
            continue;
        }
        if let Some(entity) = open.as_mut() {
            if let Some(inner) = line.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                G::describe(entity, inner.trim());
            }
        }
    }
    if let Some(done) = open {
        entities.push(done);
    }
    entities
}

/// Parses a chapter outline blob.
///
/// Chapters keep the order the model emitted them; nothing renumbers or
/// sorts.  An empty result is an error carrying the raw blob so the
/// caller can log it before retrying.
pub fn parse_chapters(blob: &str) -> ComeniusResult<Vec<Chapter>> {
    let chapters = scan(&ChapterGrammar, blob);
    if chapters.is_empty() {
        return Err(OutlineError::new(OutlineErrorKind::NoEntities(blob.to_owned())).into());
    }
    Ok(chapters)
}

/// Parses a section outline blob for one chapter.
///
/// Sections whose dotted number names a different chapter are dropped
/// with a warning.  An empty result is an error carrying the raw blob.
pub fn parse_sections(blob: &str, chapter: u32) -> ComeniusResult<Vec<Section>> {
    let sections = scan(&SectionGrammar { chapter }, blob);
    if sections.is_empty() {
        return Err(OutlineError::new(OutlineErrorKind::NoEntities(blob.to_owned())).into());
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapters_parse_in_emission_order() {
        let blob = "# 第1章 向量\n<introduces vectors>\n# 第2章 矩阵\n<introduces matrices>\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 1);
        assert_eq!(chapters[0].title, "第1章 向量");
        assert_eq!(chapters[0].description, "introduces vectors");
        assert_eq!(chapters[1].number, 2);
        assert_eq!(chapters[1].title, "第2章 矩阵");
    }

    #[test]
    fn emission_order_wins_over_numbering() {
        let blob = "# 第3章 后记\n# 第1章 前言\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters[0].number, 3);
        assert_eq!(chapters[1].number, 1);
    }

    #[test]
    fn malformed_chapter_heading_is_skipped() {
        let blob = "# 第一章 向量\n# 第2章 矩阵\n<ok>\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 2);
        assert_eq!(chapters[0].description, "ok");
    }

    #[test]
    fn malformed_heading_does_not_close_open_entity() {
        // The bad heading must neither open a chapter nor flush the
        // previous one twice; the following description still lands on
        // chapter 1.
        let blob = "# 第1章 向量\n# 第x章 坏\n<still chapter one>\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].description, "still chapter one");
    }

    #[test]
    fn chapter_heading_without_title_is_skipped() {
        let blob = "# 第1章\n# 第2章 矩阵\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 2);
    }

    #[test]
    fn later_description_overwrites_earlier() {
        let blob = "# 第1章 向量\n<first>\n<second>\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters[0].description, "second");
    }

    #[test]
    fn chatter_between_headings_is_ignored() {
        let blob = "好的，以下是大纲：\n# 第1章 向量\n这是一些解释文字。\n<desc>\n谢谢！\n";
        let chapters = parse_chapters(blob).unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].description, "desc");
    }

    #[test]
    fn empty_blob_reports_no_entities() {
        let err = parse_chapters("nothing structured here\n").unwrap_err();
        assert!(format!("{err}").contains("No well-formed"));
    }

    #[test]
    fn sections_parse_under_their_chapter() {
        let blob = "## 1.1 向量的定义\n<defines vectors>\n## 1.2 向量运算\n<adds and scales>\n";
        let sections = parse_sections(blob, 1).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].number, "1.1");
        assert_eq!(sections[0].title, "向量的定义");
        assert_eq!(sections[0].description, "defines vectors");
        assert_eq!(sections[1].number, "1.2");
    }

    #[test]
    fn section_from_wrong_chapter_is_dropped() {
        let blob = "## 1.1 定义\n## 2.1 不该在这\n## 1.2 运算\n";
        let sections = parse_sections(blob, 1).unwrap();
        let numbers: Vec<&str> = sections.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, ["1.1", "1.2"]);
    }

    #[test]
    fn section_without_dot_is_dropped() {
        let blob = "## 11 标题\n## 1.1 定义\n";
        let sections = parse_sections(blob, 1).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].number, "1.1");
    }

    #[test]
    fn chapter_headings_do_not_leak_into_sections() {
        let blob = "# 第1章 向量\n## 1.1 定义\n<desc>\n";
        let sections = parse_sections(blob, 1).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].description, "desc");
    }
}
