//! Semantic formatters: one pure text→markup transform per `SemanticType`.
//!
//! Formatters return `Result<Markup, FormatError>`. Callers never propagate the
//! error: `unwrap_or_degrade` logs it and falls back to the markdown rendering
//! of the same content, so a formatter failure can never abort a document.

pub mod education;
pub mod experience;
pub mod experience_summary;
pub mod header;
pub mod markdown;
pub mod skills;
pub mod statics;
pub mod summary;

use thiserror::Error;
use tracing::warn;

use crate::document::markup::Markup;
use crate::models::segment::SemanticType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("content is empty")]
    EmptyContent,

    #[error("no {0} entries could be parsed")]
    NoEntries(&'static str),
}

pub type FormatResult = Result<Markup, FormatError>;

type FormatFn = fn(&str) -> FormatResult;

/// Formatter selection table. Every `SemanticType` has exactly one entry.
const FORMATTERS: &[(SemanticType, FormatFn)] = &[
    (SemanticType::Header, header::format_header),
    (SemanticType::Summary, summary::format_summary),
    (SemanticType::ExperienceSummary, experience_summary::format_experience_summary),
    (SemanticType::Skills, skills::format_skills),
    (SemanticType::Experience, experience::format_experience),
    (SemanticType::Education, education::format_education),
    (SemanticType::Static, statics::format_static),
    (SemanticType::Generic, markdown::format_generic),
];

fn formatter_for(semantic_type: SemanticType) -> FormatFn {
    FORMATTERS
        .iter()
        .find(|(t, _)| *t == semantic_type)
        .map(|(_, f)| *f)
        .unwrap_or(markdown::format_generic)
}

/// Runs the formatter registered for `semantic_type` without degrading.
pub fn format_content(semantic_type: SemanticType, content: &str) -> FormatResult {
    formatter_for(semantic_type)(content)
}

/// Formats `content`, replacing any formatter failure with the degraded
/// markdown rendering.
pub fn format_or_degrade(semantic_type: SemanticType, content: &str) -> Markup {
    format_content(semantic_type, content).unwrap_or_degrade(semantic_type, content)
}

pub trait DegradeExt {
    fn unwrap_or_degrade(self, semantic_type: SemanticType, content: &str) -> Markup;
}

impl DegradeExt for FormatResult {
    fn unwrap_or_degrade(self, semantic_type: SemanticType, content: &str) -> Markup {
        match self {
            Ok(markup) => markup,
            Err(e) => {
                warn!(
                    "{} formatter failed ({e}); degrading to plain rendering",
                    semantic_type.slug()
                );
                markdown::markdown_to_html(content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [SemanticType; 8] = [
        SemanticType::Header,
        SemanticType::Summary,
        SemanticType::Skills,
        SemanticType::Experience,
        SemanticType::ExperienceSummary,
        SemanticType::Education,
        SemanticType::Static,
        SemanticType::Generic,
    ];

    #[test]
    fn test_every_type_has_exactly_one_formatter() {
        for t in ALL_TYPES {
            let count = FORMATTERS.iter().filter(|(ft, _)| *ft == t).count();
            assert_eq!(count, 1, "{t:?} must have exactly one formatter");
        }
    }

    #[test]
    fn test_degrade_replaces_error_with_markdown() {
        let result: FormatResult = Err(FormatError::NoEntries("experience"));
        let markup = result.unwrap_or_degrade(SemanticType::Experience, "• one\n• two");
        assert!(markup.as_str().contains("<li>one</li>"));
        assert!(markup.as_str().contains("<li>two</li>"));
    }

    #[test]
    fn test_experience_without_entries_degrades_instead_of_failing() {
        let content = "Worked on many interesting things over the years";
        assert_eq!(
            format_content(SemanticType::Experience, content),
            Err(FormatError::NoEntries("experience"))
        );
        let markup = format_or_degrade(SemanticType::Experience, content);
        assert!(markup.as_str().contains("Worked on many interesting things"));
    }

    #[test]
    fn test_format_or_degrade_never_returns_empty_for_nonempty_content() {
        for t in ALL_TYPES {
            let markup = format_or_degrade(t, "some text");
            assert!(markup.as_str().contains("some text"), "{t:?}");
        }
    }
}
