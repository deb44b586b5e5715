//! Static-section formatter for certifications, languages, and licenses.
//!
//! Content type is auto-detected by keyword scan, then items are grouped under
//! category headers when present (one flat group otherwise). A group whose
//! header names a type ("Languages", "Certifications") overrides the detection
//! for that group.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{bold_inner, escape_html, inline_markup, is_all_caps, strip_bullet, strip_markers, Markup};

/// `name [- provider] [(date-or-level)]`
static CERTIFICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)(?:\s+[-–—]\s+(?P<provider>.+?))?(?:\s*\((?P<date>[^()]+)\))?$").unwrap()
});

/// `language - level`, `language: level`, or `language (level)`. A
/// parenthetical before a separator stays with the language name.
static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<language>[^-–—:(]+?(?:\s*\([^()]*\))?)\s*(?:[-–—:]\s*(?P<level>.+?)|\((?P<paren>[^)]+)\))\s*$",
    )
    .unwrap()
});

static HASH_HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(?P<name>.+)$").unwrap());

const CERTIFICATION_KEYWORDS: &[&str] = &[
    "certif", "certified", "license", "licence", "credential", "accredit", "issued", "exam",
    "aws", "azure", "gcp", "pmp", "scrum", "itil", "cisco", "ccna", "cissp", "oracle", "togaf",
];

const LANGUAGE_KEYWORDS: &[&str] = &[
    "language", "native", "fluent", "mother tongue", "bilingual", "intermediate", "beginner",
    "conversational", "english", "french", "spanish", "german", "italian", "portuguese",
    "arabic", "chinese", "mandarin", "japanese", "dutch", "russian", "hindi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticContentType {
    Certifications,
    Languages,
    Generic,
}

/// Keyword scan; languages win only when they out-score certifications.
pub fn detect_content_type(content: &str) -> StaticContentType {
    let lower = content.to_lowercase();
    let cert_hits = CERTIFICATION_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();
    let lang_hits = LANGUAGE_KEYWORDS.iter().filter(|k| lower.contains(*k)).count();

    if lang_hits > cert_hits {
        StaticContentType::Languages
    } else if cert_hits > 0 {
        StaticContentType::Certifications
    } else {
        StaticContentType::Generic
    }
}

/// Group-level override from a header such as "Languages" or "Certifications".
fn type_from_group_name(name: &str) -> Option<StaticContentType> {
    let lower = name.to_lowercase();
    if lower.contains("language") {
        Some(StaticContentType::Languages)
    } else if ["certif", "license", "licence", "credential"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(StaticContentType::Certifications)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certification {
    pub name: String,
    pub provider: Option<String>,
    pub date: Option<String>,
}

pub fn parse_certification(item: &str) -> Certification {
    let item = item.trim();
    match CERTIFICATION_RE.captures(item) {
        Some(caps) => Certification {
            name: caps["name"].trim().to_string(),
            provider: caps.name("provider").map(|m| m.as_str().trim().to_string()),
            date: caps.name("date").map(|m| m.as_str().trim().to_string()),
        },
        None => Certification {
            name: item.to_string(),
            provider: None,
            date: None,
        },
    }
}

/// Ordinal proficiency class for a language level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageLevel {
    General,
    Basic,
    Intermediate,
    Professional,
    Fluent,
    Native,
}

/// Synonym table, most specific first. The first row with a matching synonym
/// decides the level, so `full professional` must precede `professional`.
const LEVEL_SYNONYMS: &[(LanguageLevel, &[&str])] = &[
    (LanguageLevel::Native, &["native", "mother tongue", "mother-tongue", "bilingual"]),
    (LanguageLevel::Fluent, &["fluent", "full professional", "c2", "c1", "proficient"]),
    (LanguageLevel::Professional, &["professional", "advanced", "working", "business", "b2"]),
    (LanguageLevel::Intermediate, &["intermediate", "conversational", "b1"]),
    (LanguageLevel::Basic, &["basic", "beginner", "elementary", "notions", "a2", "a1"]),
];

impl LanguageLevel {
    pub fn from_text(level: &str) -> Self {
        let lower = level.to_lowercase();
        LEVEL_SYNONYMS
            .iter()
            .find(|(_, synonyms)| synonyms.iter().any(|s| lower.contains(s)))
            .map(|(level, _)| *level)
            .unwrap_or(LanguageLevel::General)
    }

    pub fn css_class(self) -> &'static str {
        match self {
            LanguageLevel::Native => "level-native",
            LanguageLevel::Fluent => "level-fluent",
            LanguageLevel::Professional => "level-professional",
            LanguageLevel::Intermediate => "level-intermediate",
            LanguageLevel::Basic => "level-basic",
            LanguageLevel::General => "level-general",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageSkill {
    pub language: String,
    pub level: Option<String>,
    pub level_class: LanguageLevel,
}

pub fn parse_language(item: &str) -> LanguageSkill {
    let item = item.trim();
    let Some(caps) = LANGUAGE_RE.captures(item) else {
        return LanguageSkill {
            language: item.to_string(),
            level: None,
            level_class: LanguageLevel::General,
        };
    };
    let level = caps
        .name("level")
        .or_else(|| caps.name("paren"))
        .map(|m| m.as_str().trim().to_string());
    LanguageSkill {
        language: caps["language"].trim().to_string(),
        level_class: level
            .as_deref()
            .map(LanguageLevel::from_text)
            .unwrap_or(LanguageLevel::General),
        level,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StaticGroup {
    name: Option<String>,
    items: Vec<String>,
}

/// Bold, `#`, trailing-colon, or keyword-bearing ALL-CAPS lines. Plain
/// acronyms such as `PMP` stay items.
fn group_header(line: &str) -> Option<String> {
    let text = strip_bullet(line).unwrap_or(line).trim();
    if let Some(inner) = bold_inner(text) {
        return Some(inner.to_string());
    }
    if let Some(caps) = HASH_HEADING_RE.captures(text) {
        return Some(strip_markers(&caps["name"]));
    }
    if text.ends_with(':') {
        return Some(strip_markers(text));
    }
    if is_all_caps(text) && type_from_group_name(text).is_some() {
        return Some(text.to_string());
    }
    None
}

fn group_lines(content: &str) -> Vec<StaticGroup> {
    let mut groups: Vec<StaticGroup> = Vec::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(name) = group_header(line) {
            groups.push(StaticGroup {
                name: Some(name),
                items: Vec::new(),
            });
            continue;
        }
        let item = strip_markers(line);
        match groups.last_mut() {
            Some(group) => group.items.push(item),
            None => groups.push(StaticGroup {
                name: None,
                items: vec![item],
            }),
        }
    }
    groups
}

pub fn format_static(content: &str) -> FormatResult {
    if content.trim().is_empty() {
        return Err(FormatError::EmptyContent);
    }

    let detected = detect_content_type(content);
    let groups = group_lines(content);

    let mut html = String::from("<div class=\"static-section\">");
    for group in &groups {
        let group_type = group
            .name
            .as_deref()
            .and_then(type_from_group_name)
            .unwrap_or(detected);

        html.push_str("<div class=\"static-group\">");
        if let Some(name) = &group.name {
            html.push_str(&format!(
                "<h4 class=\"static-group-title\">{}</h4>",
                escape_html(name)
            ));
        }
        html.push_str(&render_items(group_type, &group.items));
        html.push_str("</div>");
    }
    html.push_str("</div>");
    Ok(Markup(html))
}

fn render_items(group_type: StaticContentType, items: &[String]) -> String {
    let mut html = String::new();
    match group_type {
        StaticContentType::Certifications => {
            html.push_str("<div class=\"certifications-grid\">");
            for item in items {
                let cert = parse_certification(item);
                html.push_str(&format!(
                    "<div class=\"certification-item\"><span class=\"cert-name\">{}</span>",
                    inline_markup(&cert.name)
                ));
                if let Some(provider) = &cert.provider {
                    html.push_str(&format!(
                        "<span class=\"cert-provider\">{}</span>",
                        escape_html(provider)
                    ));
                }
                if let Some(date) = &cert.date {
                    html.push_str(&format!("<span class=\"cert-date\">{}</span>", escape_html(date)));
                }
                html.push_str("</div>");
            }
        }
        StaticContentType::Languages => {
            html.push_str("<div class=\"languages-grid\">");
            for item in items {
                let lang = parse_language(item);
                html.push_str(&format!(
                    "<div class=\"language-item\"><span class=\"language-name\">{}</span>",
                    inline_markup(&lang.language)
                ));
                if let Some(level) = &lang.level {
                    html.push_str(&format!(
                        "<span class=\"language-level {}\">{}</span>",
                        lang.level_class.css_class(),
                        escape_html(level)
                    ));
                }
                html.push_str("</div>");
            }
        }
        StaticContentType::Generic => {
            html.push_str("<div class=\"static-list\">");
            for item in items {
                html.push_str(&format!("<div class=\"static-item\">{}</div>", inline_markup(item)));
            }
        }
    }
    html.push_str("</div>");
    html
}
