//! Segment Classifier: assigns a semantic type, formatting mode, and priority
//! to each segment from its title, with one content signal for generic sections.
//!
//! Rules are evaluated in declaration order and the first match wins. The order
//! IS the precedence: multi-keyword rules sit above the single-keyword rules
//! they overlap with. In particular "experience" + "summary" must be checked
//! before both the summary rule and the plain experience rule, otherwise an
//! "Experience Summary" title would be swallowed by whichever comes first.
//! Reordering this table changes classification results.

use crate::document::markup::{is_bulleted, is_numbered};
use crate::document::normalizer::normalize;
use crate::models::segment::{ClassifiedSegment, FormattingMode, Priority, Segment, SemanticType};

/// Output of the classifier for one title/content pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub semantic_type: SemanticType,
    pub formatting_mode: FormattingMode,
    pub priority: Priority,
}

struct Rule {
    /// Every group must match; a group matches when any of its keywords is a
    /// substring of the lowercased title.
    all_of: &'static [&'static [&'static str]],
    semantic_type: SemanticType,
    formatting_mode: FormattingMode,
    priority: Priority,
}

const RULES: &[Rule] = &[
    Rule {
        all_of: &[&["header", "name"]],
        semantic_type: SemanticType::Header,
        formatting_mode: FormattingMode::Paragraph,
        priority: Priority::High,
    },
    Rule {
        all_of: &[
            &["experience", "career"],
            &["summary", "overview", "highlights"],
        ],
        semantic_type: SemanticType::ExperienceSummary,
        formatting_mode: FormattingMode::Paragraph,
        priority: Priority::High,
    },
    Rule {
        all_of: &[&["summary", "executive", "profile"]],
        semantic_type: SemanticType::Summary,
        formatting_mode: FormattingMode::Paragraph,
        priority: Priority::High,
    },
    Rule {
        all_of: &[&["skill", "competenc", "expertise", "technical", "functional"]],
        semantic_type: SemanticType::Skills,
        formatting_mode: FormattingMode::List,
        priority: Priority::High,
    },
    Rule {
        all_of: &[&["experience", "employment"]],
        semantic_type: SemanticType::Experience,
        formatting_mode: FormattingMode::Paragraph,
        priority: Priority::High,
    },
    Rule {
        all_of: &[&["education", "qualification", "academic", "degree"]],
        semantic_type: SemanticType::Education,
        formatting_mode: FormattingMode::List,
        priority: Priority::Medium,
    },
    Rule {
        all_of: &[&["language", "certification", "license", "licence"]],
        semantic_type: SemanticType::Static,
        formatting_mode: FormattingMode::Columns,
        priority: Priority::Medium,
    },
];

const GENERIC: Classification = Classification {
    semantic_type: SemanticType::Generic,
    formatting_mode: FormattingMode::Paragraph,
    priority: Priority::Low,
};

/// Classifies a title/content pair. Pure and total: unmatched titles fall back
/// to `Generic` rather than erroring.
pub fn classify(title: &str, content: &str) -> Classification {
    let title = title.to_lowercase();

    let matched = RULES.iter().find(|rule| {
        rule.all_of
            .iter()
            .all(|group| group.iter().any(|kw| title.contains(kw)))
    });

    match matched {
        Some(rule) => Classification {
            semantic_type: rule.semantic_type,
            formatting_mode: rule.formatting_mode,
            priority: rule.priority,
        },
        None if mostly_bulleted(content) => Classification {
            formatting_mode: FormattingMode::List,
            ..GENERIC
        },
        None => GENERIC,
    }
}

/// More than half of the non-empty lines carry a bullet or a number.
fn mostly_bulleted(content: &str) -> bool {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return false;
    }
    let bulleted = lines
        .iter()
        .filter(|l| is_bulleted(l) || is_numbered(l))
        .count();
    bulleted * 2 > lines.len()
}

/// Classifies a segment and normalizes its content for the chosen mode.
pub fn classify_segment(segment: Segment) -> ClassifiedSegment {
    let c = classify(&segment.title, &segment.raw_content);
    let content = normalize(&segment.raw_content, c.formatting_mode);
    ClassifiedSegment {
        segment,
        semantic_type: c.semantic_type,
        formatting_mode: c.formatting_mode,
        priority: c.priority,
        content,
    }
}
