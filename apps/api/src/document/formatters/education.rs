//! Education formatter: one card per non-empty line.

use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{inline_markup, strip_markers, Markup};

pub fn format_education(content: &str) -> FormatResult {
    let items: Vec<String> = content
        .lines()
        .map(strip_markers)
        .filter(|l| !l.is_empty())
        .collect();
    if items.is_empty() {
        return Err(FormatError::EmptyContent);
    }

    let mut html = String::from("<div class=\"education-list\">");
    for item in &items {
        html.push_str(&format!(
            "<div class=\"education-item\">{}</div>",
            inline_markup(item)
        ));
    }
    html.push_str("</div>");
    Ok(Markup(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_line_becomes_a_card_without_markers() {
        let html = format_education("• MSc Computer Science - ETH Zurich (2016)\n**BSc Mathematics**\n\n").unwrap();
        assert_eq!(
            html.as_str(),
            "<div class=\"education-list\"><div class=\"education-item\">MSc Computer Science - ETH Zurich (2016)</div><div class=\"education-item\">BSc Mathematics</div></div>"
        );
    }

    #[test]
    fn test_empty_education_is_an_error() {
        assert_eq!(format_education("•  \n"), Err(FormatError::EmptyContent));
    }
}
