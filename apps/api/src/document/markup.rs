//! Markup primitives shared by the normalizer and every formatter: bullet and
//! bold marker detection, HTML escaping, inline `**bold**` conversion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Characters accepted as a bullet when followed by whitespace.
const BULLET_MARKERS: &[char] = &['•', '-', '*', '·', '▪', '◦', '‣', '–', '►'];

static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}[.)]\s+\S").unwrap());
static BOLD_INLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// An HTML fragment produced by a formatter or the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Markup(pub String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Markup {
    fn from(s: String) -> Self {
        Markup(s)
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes `text` and turns `**x**` runs into `<strong>x</strong>`.
pub fn inline_markup(text: &str) -> String {
    let escaped = escape_html(text);
    BOLD_INLINE_RE
        .replace_all(&escaped, "<strong>$1</strong>")
        .into_owned()
}

/// Returns the text after a leading bullet marker, if the line has one.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if !BULLET_MARKERS.contains(&first) {
        return None;
    }
    let rest = chars.as_str();
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

pub fn is_bulleted(line: &str) -> bool {
    strip_bullet(line).is_some()
}

pub fn is_numbered(line: &str) -> bool {
    NUMBERED_RE.is_match(line.trim_start())
}

pub fn is_dash_prefixed(line: &str) -> bool {
    let t = line.trim_start();
    (t.starts_with("- ") || t.starts_with("– ")) && t.len() > 2
}

/// Returns the inner text when the whole line is wrapped in `**…**`.
/// A trailing colon inside or outside the markers is tolerated.
pub fn bold_inner(line: &str) -> Option<&str> {
    let t = line.trim().trim_end_matches(':').trim_end();
    let inner = t.strip_prefix("**")?.strip_suffix("**")?;
    let inner = inner.trim().trim_end_matches(':').trim_end();
    if inner.is_empty() || inner.contains("**") {
        None
    } else {
        Some(inner)
    }
}

/// At least two letters and no lowercase letters.
pub fn is_all_caps(line: &str) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| !c.is_lowercase())
}

/// ALL-CAPS line long enough to read as a heading rather than an acronym
/// (`CLOUD PLATFORMS` yes, `AWS` or `SQL` no). Digits disqualify.
pub fn is_caps_heading(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    is_all_caps(line) && letters >= 5 && !line.chars().any(|c| c.is_ascii_digit())
}

/// Strips one bullet marker, surrounding bold markers, and a trailing colon.
pub fn strip_markers(line: &str) -> String {
    let t = line.trim();
    let t = strip_bullet(t).unwrap_or(t);
    let t = match bold_inner(t) {
        Some(inner) => inner,
        None => t,
    };
    t.trim().trim_end_matches(':').trim().to_string()
}

/// Non-whitespace tokens with bullet and bold markers removed; used to check
/// that reshaping text never loses content.
#[cfg(test)]
pub fn content_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|tok| {
            tok.trim_matches(|c: char| c == '*' || BULLET_MARKERS.contains(&c))
                .to_string()
        })
        .filter(|tok| !tok.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_inline_markup_converts_bold_after_escaping() {
        assert_eq!(
            inline_markup("**Lead** of <team>"),
            "<strong>Lead</strong> of &lt;team&gt;"
        );
    }

    #[test]
    fn test_strip_bullet_requires_whitespace_after_marker() {
        assert_eq!(strip_bullet("• Built X"), Some("Built X"));
        assert_eq!(strip_bullet("- Led Y"), Some("Led Y"));
        assert_eq!(strip_bullet("**Bold**"), None);
        assert_eq!(strip_bullet("-5% churn"), None);
    }

    #[test]
    fn test_bold_inner() {
        assert_eq!(bold_inner("**Cloud:**"), Some("Cloud"));
        assert_eq!(bold_inner("**Cloud**:"), Some("Cloud"));
        assert_eq!(bold_inner("**a** and **b**"), None);
        assert_eq!(bold_inner("plain"), None);
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("PROGRAMMING LANGUAGES"));
        assert!(!is_all_caps("Programming"));
        assert!(!is_all_caps("2019"));
    }

    #[test]
    fn test_is_caps_heading_skips_acronyms() {
        assert!(is_caps_heading("CLOUD"));
        assert!(is_caps_heading("PROGRAMMING LANGUAGES"));
        assert!(!is_caps_heading("AWS"));
        assert!(!is_caps_heading("HTML5 CSS3"));
    }

    #[test]
    fn test_strip_markers() {
        assert_eq!(strip_markers("• **Master of Science:**"), "Master of Science");
        assert_eq!(strip_markers("  plain text "), "plain text");
    }

    #[test]
    fn test_is_numbered() {
        assert!(is_numbered("1. Backend"));
        assert!(is_numbered("2) Frontend"));
        assert!(!is_numbered("2019 - 2022"));
    }
}
