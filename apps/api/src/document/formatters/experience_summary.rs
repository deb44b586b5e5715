//! Experience-summary formatter. Condensed multi-entry lists
//! (`Company - Role 2019 - 2022` on several lines) render as compact cards;
//! anything else renders as prose paragraphs.

use crate::document::formatters::experience::{parse_company_header, CompanyHeader};
use crate::document::formatters::summary::render_paragraphs;
use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{escape_html, inline_markup, strip_bullet, Markup};

/// Minimum number of company lines before the content counts as a list.
const MIN_CARD_ENTRIES: usize = 2;

struct Card<'a> {
    header: CompanyHeader,
    details: Vec<&'a str>,
}

pub fn format_experience_summary(content: &str) -> FormatResult {
    if content.trim().is_empty() {
        return Err(FormatError::EmptyContent);
    }

    let header_count = content
        .lines()
        .filter(|l| parse_company_header(l).is_some())
        .count();

    if header_count >= MIN_CARD_ENTRIES {
        Ok(render_cards(content))
    } else {
        Ok(render_paragraphs(content, "experience-summary"))
    }
}

fn render_cards(content: &str) -> Markup {
    let mut intro: Vec<&str> = Vec::new();
    let mut cards: Vec<Card> = Vec::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(header) = parse_company_header(line) {
            cards.push(Card { header, details: Vec::new() });
            continue;
        }
        let text = strip_bullet(line).unwrap_or(line);
        match cards.last_mut() {
            Some(card) => card.details.push(text),
            None => intro.push(text),
        }
    }

    let mut html = String::from("<div class=\"experience-summary\">");
    if !intro.is_empty() {
        html.push_str(&format!(
            "<p class=\"summary-opening\">{}</p>",
            inline_markup(&intro.join(" "))
        ));
    }
    html.push_str("<div class=\"experience-cards\">");
    for card in &cards {
        html.push_str(&format!(
            "<div class=\"experience-card\"><div class=\"experience-card-header\"><span class=\"experience-company\">{}</span><span class=\"experience-dates\">{}</span></div>",
            escape_html(&card.header.company),
            escape_html(&card.header.dates)
        ));
        if !card.header.role.is_empty() {
            html.push_str(&format!(
                "<div class=\"experience-role\">{}</div>",
                escape_html(&card.header.role)
            ));
        }
        for detail in &card.details {
            html.push_str(&format!(
                "<p class=\"experience-card-detail\">{}</p>",
                inline_markup(detail)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></div>");
    Markup(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_company_lines_render_cards() {
        let content = "Acme — Engineer 2019 - 2022\n\nGlobex — Intern 2017 - 2018\n\nBuilt internal tools";
        let html = format_experience_summary(content).unwrap().into_string();
        assert_eq!(html.matches("class=\"experience-card\"").count(), 2);
        assert!(html.contains("<span class=\"experience-company\">Globex</span>"));
        assert!(html.contains("Built internal tools"));
    }

    #[test]
    fn test_prose_renders_paragraphs() {
        let content = "Fifteen years across fintech and retail.\n\nLed teams of up to 20 engineers.";
        let html = format_experience_summary(content).unwrap().into_string();
        assert!(!html.contains("experience-card"));
        assert!(html.contains("<p class=\"summary-opening\">Fifteen years across fintech and retail.</p>"));
        assert!(html.contains("<p>Led teams of up to 20 engineers.</p>"));
    }

    #[test]
    fn test_single_company_line_stays_prose() {
        let content = "Acme - Engineer 2019 - 2022\n\nDelivered the payments platform.";
        let html = format_experience_summary(content).unwrap().into_string();
        assert!(!html.contains("experience-card"));
    }

    #[test]
    fn test_empty_content_is_an_error() {
        assert_eq!(format_experience_summary(" "), Err(FormatError::EmptyContent));
    }
}
