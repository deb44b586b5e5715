//! Header formatter: sorts header lines into contact info, experience duration,
//! and plain header lines. The first plain line is styled as the name line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{inline_markup, strip_markers, Markup};

static DURATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\d+\+?\s*(?:years|yrs)\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLineKind {
    Contact,
    Duration,
    Plain,
}

pub fn classify_header_line(line: &str) -> HeaderLineKind {
    if line.contains('@') || line.contains('+') || line.to_lowercase().contains("phone") {
        HeaderLineKind::Contact
    } else if DURATION_RE.is_match(line) {
        HeaderLineKind::Duration
    } else {
        HeaderLineKind::Plain
    }
}

pub fn format_header(content: &str) -> FormatResult {
    let lines: Vec<String> = content
        .lines()
        .map(strip_markers)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(FormatError::EmptyContent);
    }

    let mut html = String::from("<div class=\"header-content\">");
    let mut name_seen = false;
    for line in &lines {
        let class = match classify_header_line(line) {
            HeaderLineKind::Contact => "contact-info",
            HeaderLineKind::Duration => "experience-duration",
            HeaderLineKind::Plain if !name_seen => {
                name_seen = true;
                "header-name"
            }
            HeaderLineKind::Plain => "header-line",
        };
        html.push_str(&format!("<div class=\"{class}\">{}</div>", inline_markup(line)));
    }
    html.push_str("</div>");
    Ok(Markup(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_header_lines() {
        assert_eq!(classify_header_line("jane@example.com"), HeaderLineKind::Contact);
        assert_eq!(classify_header_line("+33 6 12 34 56 78"), HeaderLineKind::Contact);
        assert_eq!(classify_header_line("Phone: 555 0100"), HeaderLineKind::Contact);
        assert_eq!(classify_header_line("12 years of experience"), HeaderLineKind::Duration);
        assert_eq!(classify_header_line("8yrs in fintech"), HeaderLineKind::Duration);
        assert_eq!(classify_header_line("Senior Data Engineer"), HeaderLineKind::Plain);
    }

    #[test]
    fn test_format_header() {
        let html = format_header("Jane Doe\nSenior Engineer\njane@example.com\n10 years").unwrap();
        assert_eq!(
            html.as_str(),
            "<div class=\"header-content\"><div class=\"header-name\">Jane Doe</div><div class=\"header-line\">Senior Engineer</div><div class=\"contact-info\">jane@example.com</div><div class=\"experience-duration\">10 years</div></div>"
        );
    }

    #[test]
    fn test_empty_header_is_an_error() {
        assert_eq!(format_header("  "), Err(FormatError::EmptyContent));
    }
}
