//! Content Normalizer: strips whitespace noise and reshapes raw text into the
//! canonical form expected by the formatters for a given `FormattingMode`.
//!
//! Normalization only re-punctuates: every content token of the input survives
//! (bullet and bold markers excepted), no line is ever dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::markup::{bold_inner, is_bulleted, is_caps_heading, is_numbered, strip_bullet};
use crate::models::segment::FormattingMode;

static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

const BULLET: &str = "• ";

/// Normalizes `raw` for `mode`. Empty or whitespace-only input yields `""`.
pub fn normalize(raw: &str, mode: FormattingMode) -> String {
    let lines = clean_lines(raw);

    match mode {
        FormattingMode::List => lines
            .iter()
            .map(|line| reshape_list_line(line))
            .collect::<Vec<_>>()
            .join("\n"),
        FormattingMode::Columns => lines
            .iter()
            .map(|line| format!("{BULLET}{}", strip_bullet(line).unwrap_or(line)))
            .collect::<Vec<_>>()
            .join("\n"),
        FormattingMode::Paragraph => lines.join("\n\n"),
        FormattingMode::Table => lines.join("\n"),
    }
}

/// Collapses whitespace runs, trims each line, and merges blank-line-delimited
/// blocks by dropping the blank lines.
fn clean_lines(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(|line| WHITESPACE_RUN_RE.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect()
}

fn reshape_list_line(line: &str) -> String {
    if is_bulleted(line) || is_numbered(line) || bold_inner(line).is_some() {
        line.to_string()
    } else if looks_like_header(line) {
        format!("**{line}**")
    } else {
        format!("{BULLET}{line}")
    }
}

/// Trailing colon, or ALL-CAPS text of reasonable heading length.
pub fn looks_like_header(line: &str) -> bool {
    let line = line.trim();
    line.ends_with(':') || (is_caps_heading(line) && line.chars().count() <= 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::markup::content_tokens;
    use std::collections::BTreeSet;

    const RAW: &str = "  PROGRAMMING   LANGUAGES\r\n\r\n\tRust,  Go \n- Python\n\n\nCloud:\n1. AWS\n**Tools**\n  Docker &  Kubernetes  ";

    fn token_set(text: &str) -> BTreeSet<String> {
        content_tokens(text).into_iter().collect()
    }

    #[test]
    fn test_list_mode_bullets_and_bolds_headers() {
        let out = normalize(RAW, FormattingMode::List);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "**PROGRAMMING LANGUAGES**",
                "• Rust, Go",
                "- Python",
                "**Cloud:**",
                "1. AWS",
                "**Tools**",
                "• Docker & Kubernetes",
            ]
        );
    }

    #[test]
    fn test_columns_mode_bullets_every_line_uniformly() {
        let out = normalize("French - Native\n- English - Fluent\n• German", FormattingMode::Columns);
        assert_eq!(out, "• French - Native\n• English - Fluent\n• German");
    }

    #[test]
    fn test_paragraph_mode_joins_with_blank_lines() {
        let out = normalize("First line\n\n\nSecond   line\nThird", FormattingMode::Paragraph);
        assert_eq!(out, "First line\n\nSecond line\n\nThird");
    }

    #[test]
    fn test_table_mode_keeps_rows() {
        let out = normalize("a | b\n\n c | d ", FormattingMode::Table);
        assert_eq!(out, "a | b\nc | d");
    }

    #[test]
    fn test_empty_input_normalizes_to_empty() {
        for mode in [
            FormattingMode::List,
            FormattingMode::Columns,
            FormattingMode::Paragraph,
            FormattingMode::Table,
        ] {
            assert_eq!(normalize(" \n\t\n ", mode), "");
        }
    }

    #[test]
    fn test_normalization_preserves_content_tokens_for_every_mode() {
        let inputs = [
            RAW,
            "Acme Corp - Senior Engineer 2019 - 2022\n• Built X\n• Led Y",
            "AWS Solutions Architect - Amazon (2022)\nFrench - Native",
            "  just   prose \n\n with gaps  ",
        ];
        for input in inputs {
            for mode in [
                FormattingMode::List,
                FormattingMode::Columns,
                FormattingMode::Paragraph,
                FormattingMode::Table,
            ] {
                let out = normalize(input, mode);
                assert_eq!(
                    token_set(&out),
                    token_set(input),
                    "tokens changed for mode {mode:?} on {input:?}"
                );
            }
        }
    }

    #[test]
    fn test_normalization_is_stable_on_canonical_text() {
        for mode in [FormattingMode::List, FormattingMode::Columns, FormattingMode::Paragraph] {
            let once = normalize(RAW, mode);
            assert_eq!(normalize(&once, mode), once, "mode {mode:?}");
        }
    }

    #[test]
    fn test_looks_like_header() {
        assert!(looks_like_header("Cloud:"));
        assert!(looks_like_header("CERTIFICATIONS"));
        assert!(!looks_like_header("Rust, Go"));
        assert!(!looks_like_header("AWS"));
    }
}
