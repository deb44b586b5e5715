//! Skills formatter: streaming categorizer over the line stream.
//!
//! - bold, ALL-CAPS heading, numbered, `#` heading, or `Label:` lines open a category;
//! - `- Label:` (dash-prefixed sub-heading) opens a subcategory of the current
//!   category, or a new category when none is open yet;
//! - `**Label:** a, b` or `Label: a, b` (optionally bulleted) opens a category
//!   whose items are the comma-separated rest; dash-prefixed, a subcategory.
//!   A plain label needs at least two items so `Rust: 5 years` stays an item;
//! - every other non-empty line is one skill item of the innermost open bucket,
//!   or of the uncategorized bucket before the first category.
//!
//! When no category is ever opened the whole input renders as one flat tag
//! list. Every input line ends up as a bucket name, an item, or both; nothing
//! is dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{
    bold_inner, escape_html, inline_markup, is_caps_heading, is_dash_prefixed, strip_bullet, strip_markers,
    Markup,
};

static NUMBERED_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}[.)]\s+(?P<name>.+)$").unwrap());
static HASH_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(?P<name>.+)$").unwrap());
static INLINE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\*\*(?P<bold>[^*]+?):?\*\*:?|(?P<plain>[A-Z][\w/&+.#' -]{0,39}?):)\s+(?P<rest>\S.*)$").unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillSubcategory {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillCategory {
    pub name: String,
    pub items: Vec<String>,
    pub subcategories: Vec<SkillSubcategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillBreakdown {
    /// Items seen before any category was opened.
    pub uncategorized: Vec<String>,
    pub categories: Vec<SkillCategory>,
}

impl SkillBreakdown {
    #[cfg(test)]
    pub fn item_count(&self) -> usize {
        self.uncategorized.len()
            + self
                .categories
                .iter()
                .map(|c| c.items.len() + c.subcategories.iter().map(|s| s.items.len()).sum::<usize>())
                .sum::<usize>()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SkillLine {
    Category(String, Vec<String>),
    Subcategory(String, Vec<String>),
    Item(String),
}

/// Label and items of a `Label: a, b` line.
fn inline_label(text: &str) -> Option<(String, Vec<String>)> {
    let caps = INLINE_LABEL_RE.captures(text.trim())?;
    let items: Vec<String> = caps["rest"]
        .split([',', ';', '|'])
        .map(strip_markers)
        .filter(|item| !item.is_empty())
        .collect();
    let name = match (caps.name("bold"), caps.name("plain")) {
        (Some(bold), _) => bold.as_str(),
        (None, Some(plain)) if items.len() >= 2 => plain.as_str(),
        _ => return None,
    };
    Some((name.trim().to_string(), items))
}

fn classify_line(line: &str) -> SkillLine {
    if is_dash_prefixed(line) {
        let rest = strip_bullet(line).unwrap_or(line);
        if let Some(inner) = bold_inner(rest) {
            return SkillLine::Subcategory(inner.to_string(), Vec::new());
        }
        if rest.ends_with(':') {
            return SkillLine::Subcategory(strip_markers(rest), Vec::new());
        }
        if let Some((name, items)) = inline_label(rest) {
            return SkillLine::Subcategory(name, items);
        }
        return SkillLine::Item(strip_markers(rest));
    }

    // A bulleted line is a category only when its whole text is bold.
    if let Some(rest) = strip_bullet(line) {
        if let Some(inner) = bold_inner(rest) {
            return SkillLine::Category(inner.to_string(), Vec::new());
        }
        return match inline_label(rest) {
            Some((name, items)) => SkillLine::Category(name, items),
            None => SkillLine::Item(strip_markers(rest)),
        };
    }

    if let Some(inner) = bold_inner(line) {
        return SkillLine::Category(inner.to_string(), Vec::new());
    }
    if let Some(caps) = HASH_HEADING_RE.captures(line) {
        return SkillLine::Category(strip_markers(&caps["name"]), Vec::new());
    }
    if let Some(caps) = NUMBERED_HEADING_RE.captures(line) {
        return SkillLine::Category(strip_markers(&caps["name"]), Vec::new());
    }
    if let Some((name, items)) = inline_label(line) {
        return SkillLine::Category(name, items);
    }
    if line.ends_with(':') || is_caps_heading(line) {
        return SkillLine::Category(strip_markers(line), Vec::new());
    }
    SkillLine::Item(strip_markers(line))
}

/// Runs the categorizer over canonical skills text.
pub fn categorize_skills(content: &str) -> SkillBreakdown {
    let mut breakdown = SkillBreakdown::default();
    let mut in_subcategory = false;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classify_line(line) {
            SkillLine::Category(name, items) => {
                breakdown.categories.push(SkillCategory {
                    name,
                    items,
                    ..Default::default()
                });
                in_subcategory = false;
            }
            SkillLine::Subcategory(name, items) => match breakdown.categories.last_mut() {
                Some(category) => {
                    category.subcategories.push(SkillSubcategory { name, items });
                    in_subcategory = true;
                }
                None => {
                    breakdown.categories.push(SkillCategory {
                        name,
                        items,
                        ..Default::default()
                    });
                    in_subcategory = false;
                }
            },
            SkillLine::Item(item) => match breakdown.categories.last_mut() {
                Some(category) if in_subcategory => {
                    if let Some(sub) = category.subcategories.last_mut() {
                        sub.items.push(item);
                    }
                }
                Some(category) => category.items.push(item),
                None => breakdown.uncategorized.push(item),
            },
        }
    }

    breakdown
}

pub fn format_skills(content: &str) -> FormatResult {
    if content.trim().is_empty() {
        return Err(FormatError::EmptyContent);
    }

    let breakdown = categorize_skills(content);

    if breakdown.categories.is_empty() {
        return Ok(Markup(render_tags("skills-tags", &breakdown.uncategorized)));
    }

    let mut html = String::from("<div class=\"skills-grid\">");
    if !breakdown.uncategorized.is_empty() {
        html.push_str("<div class=\"skill-category skill-category-general\">");
        html.push_str(&render_tags("skill-tags", &breakdown.uncategorized));
        html.push_str("</div>");
    }
    for category in &breakdown.categories {
        html.push_str(&format!(
            "<div class=\"skill-category\"><h4 class=\"skill-category-title\">{}</h4>",
            escape_html(&category.name)
        ));
        if !category.items.is_empty() {
            html.push_str(&render_tags("skill-tags", &category.items));
        }
        for sub in &category.subcategories {
            html.push_str(&format!(
                "<div class=\"skill-subcategory\"><h5 class=\"skill-subcategory-title\">{}</h5>",
                escape_html(&sub.name)
            ));
            html.push_str(&render_tags("skill-tags", &sub.items));
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    Ok(Markup(html))
}

fn render_tags(class: &str, items: &[String]) -> String {
    let mut html = format!("<div class=\"{class}\">");
    for item in items {
        html.push_str(&format!("<span class=\"skill-tag\">{}</span>", inline_markup(item)));
    }
    html.push_str("</div>");
    html
}
