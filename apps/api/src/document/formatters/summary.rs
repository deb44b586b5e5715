//! Summary formatter: paragraphs split on blank lines, the first one marked as
//! the opening paragraph.

use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{inline_markup, strip_bullet, Markup};

pub fn format_summary(content: &str) -> FormatResult {
    if content.trim().is_empty() {
        return Err(FormatError::EmptyContent);
    }
    Ok(render_paragraphs(content, "summary-content"))
}

/// Splits on blank lines and joins the lines of each paragraph with a space.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.push(strip_bullet(line).unwrap_or(line));
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs
}

pub(crate) fn render_paragraphs(content: &str, wrapper_class: &str) -> Markup {
    let mut html = format!("<div class=\"{wrapper_class}\">");
    for (i, paragraph) in split_paragraphs(content).iter().enumerate() {
        if i == 0 {
            html.push_str(&format!(
                "<p class=\"summary-opening\">{}</p>",
                inline_markup(paragraph)
            ));
        } else {
            html.push_str(&format!("<p>{}</p>", inline_markup(paragraph)));
        }
    }
    html.push_str("</div>");
    Markup(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paragraphs() {
        let paragraphs = split_paragraphs("One\ncontinues\n\n\nTwo\n\n");
        assert_eq!(paragraphs, vec!["One continues", "Two"]);
    }

    #[test]
    fn test_first_paragraph_is_opening() {
        let html = format_summary("Seasoned **architect**.\n\nLoves Rust.").unwrap();
        assert_eq!(
            html.as_str(),
            "<div class=\"summary-content\"><p class=\"summary-opening\">Seasoned <strong>architect</strong>.</p><p>Loves Rust.</p></div>"
        );
    }

    #[test]
    fn test_empty_summary_is_an_error() {
        assert_eq!(format_summary("\n \n"), Err(FormatError::EmptyContent));
    }
}
