//! Experience formatter: line-stream state machine that groups free text into
//! `ParsedExperienceEntry` values and renders them as entry cards.
//!
//! # Line precedence (first match wins)
//! 1. Company header: not bulleted, contains a ` - ` / ` – ` / ` — ` / ` | `
//!    separator and a 4-digit year after it. Opens a new entry.
//! 2. Subsection header: bold line (bulleted or not), or `Title Case:` line.
//!    Opens achievements /
//!    technical environment / responsibilities by keyword. `Label: items` is
//!    accepted inline when the label is a known subsection keyword.
//! 3. Bulleted line → item of the current subsection.
//! 4. Unbulleted line ≥ 10 chars → item of the current subsection, even when no
//!    subsection header has been seen yet (default "Key Responsibilities").
//! 5. Short unbulleted line → item if a subsection header was seen, otherwise
//!    entry meta (location, contract type…).
//!
//! Lines before the first company header are kept as an intro paragraph.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::document::formatters::{FormatError, FormatResult};
use crate::document::markup::{bold_inner, escape_html, inline_markup, is_numbered, strip_bullet, Markup};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}").unwrap());

/// Date range anchored at the end of the role+dates text. Month names or
/// `MM/` prefixes are optional; the end may be a year or Present/Current/Now.
static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    let month = r"(?:\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+|\b\d{1,2}/)";
    Regex::new(&format!(
        r"(?i)[(\[,]?\s*(?P<range>{month}?(?:19|20)\d{{2}}(?:\s*(?:-|–|—|to)\s*(?:{month}?(?:19|20)\d{{2}}|present|current|now|today))?)\s*[)\]]?\s*$"
    ))
    .unwrap()
});

static TITLE_COLON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<label>[A-Z][A-Za-z/&,' ]{1,48}):\s*(?P<rest>.*)$").unwrap()
});

const SEPARATORS: &[&str] = &[" - ", " – ", " — ", " | "];
const MIN_ITEM_LEN: usize = 10;
const MAX_HEADER_LEN: usize = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsectionKind {
    Responsibilities,
    Achievements,
    TechnicalEnvironment,
}

impl SubsectionKind {
    fn title(self) -> &'static str {
        match self {
            SubsectionKind::Responsibilities => "Key Responsibilities",
            SubsectionKind::Achievements => "Key Achievements",
            SubsectionKind::TechnicalEnvironment => "Technical Environment",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        const ACHIEVEMENTS: &[&str] = &["achiev", "accomplish", "result", "impact", "highlight"];
        const TECHNICAL: &[&str] = &["technical", "environment", "technolog", "stack", "tools"];
        const RESPONSIBILITIES: &[&str] = &["responsib", "duties", "mission", "tasks", "activities"];

        if ACHIEVEMENTS.iter().any(|k| label.contains(k)) {
            Some(SubsectionKind::Achievements)
        } else if TECHNICAL.iter().any(|k| label.contains(k)) {
            Some(SubsectionKind::TechnicalEnvironment)
        } else if RESPONSIBILITIES.iter().any(|k| label.contains(k)) {
            Some(SubsectionKind::Responsibilities)
        } else {
            None
        }
    }
}

/// One employment entry, built from the lines between two company headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedExperienceEntry {
    pub company: String,
    pub role: String,
    pub date_range: String,
    pub meta: Vec<String>,
    pub responsibilities: Vec<String>,
    pub achievements: Vec<String>,
    pub technical_environment: Vec<String>,
}

impl ParsedExperienceEntry {
    fn push(&mut self, kind: SubsectionKind, item: &str) {
        match kind {
            SubsectionKind::Responsibilities => self.responsibilities.push(item.to_string()),
            SubsectionKind::Achievements => self.achievements.push(item.to_string()),
            SubsectionKind::TechnicalEnvironment => self.technical_environment.extend(
                item.split([',', ';', '|'])
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExperienceParse {
    pub intro: Vec<String>,
    pub entries: Vec<ParsedExperienceEntry>,
}

/// Company / role / dates split from a company header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyHeader {
    pub company: String,
    pub role: String,
    pub dates: String,
}

/// Detects and splits a company header line. Returns `None` for anything that
/// is not one (bullets, prose without a year, lines without a separator).
pub fn parse_company_header(line: &str) -> Option<CompanyHeader> {
    let line = line.trim();
    if line.is_empty()
        || line.len() > MAX_HEADER_LEN
        || strip_bullet(line).is_some()
        || is_numbered(line)
    {
        return None;
    }

    let cleaned = line.replace("**", "");
    let cleaned = cleaned.trim_start_matches('#').trim();

    let (sep_idx, sep) = SEPARATORS
        .iter()
        .filter_map(|sep| cleaned.find(sep).map(|idx| (idx, *sep)))
        .min_by_key(|(idx, _)| *idx)?;

    let company = cleaned[..sep_idx].trim();
    let rest = cleaned[sep_idx + sep.len()..].trim();
    if company.is_empty() || rest.is_empty() || !YEAR_RE.is_match(rest) {
        return None;
    }

    let (role, dates) = match DATE_RANGE_RE.captures(rest) {
        Some(caps) => {
            let whole = caps.get(0)?;
            let role = rest[..whole.start()].trim();
            (role.to_string(), caps["range"].trim().to_string())
        }
        None => {
            // Dates did not match the range pattern: require at least a digit in
            // the trailing token so prose with a year in the middle is rejected.
            let last = rest.split_whitespace().last()?;
            if !last.chars().any(|c| c.is_ascii_digit()) {
                return None;
            }
            split_role_fallback(rest)
        }
    };

    Some(CompanyHeader {
        company: company.to_string(),
        role: trim_role(&role),
        dates,
    })
}

/// Leading non-numeric run is the role; the remainder (or the trailing token
/// when there is no leading text) holds the dates.
fn split_role_fallback(rest: &str) -> (String, String) {
    match rest.find(|c: char| c.is_ascii_digit()) {
        Some(idx) if idx > 0 => (rest[..idx].to_string(), rest[idx..].trim().to_string()),
        _ => {
            let mut tokens: Vec<&str> = rest.split_whitespace().collect();
            let dates = tokens.pop().unwrap_or_default().to_string();
            (tokens.join(" "), dates)
        }
    }
}

fn trim_role(role: &str) -> String {
    role.trim()
        .trim_end_matches(|c: char| matches!(c, ',' | '|' | '(' | '[' | '-' | '–' | '—' | ':') || c.is_whitespace())
        .to_string()
}

/// Returns the subsection kind and any inline items when `line` is a
/// subsection header.
fn parse_subsection_header(line: &str) -> Option<(SubsectionKind, Option<String>, Option<String>)> {
    // A bulleted line is a header only when its whole text is a bold, known label.
    if let Some(rest) = strip_bullet(line) {
        let kind = bold_inner(rest).and_then(SubsectionKind::from_label)?;
        return Some((kind, None, None));
    }

    if let Some(inner) = bold_inner(line) {
        return Some(match SubsectionKind::from_label(inner) {
            Some(kind) => (kind, None, None),
            None => (SubsectionKind::Responsibilities, Some(inner.to_string()), None),
        });
    }

    let caps = TITLE_COLON_RE.captures(line.trim())?;
    let label = caps["label"].trim();
    let rest = caps["rest"].trim();
    let kind = SubsectionKind::from_label(label);

    match (kind, rest.is_empty()) {
        (Some(kind), true) => Some((kind, None, None)),
        (Some(kind), false) => Some((kind, None, Some(rest.to_string()))),
        (None, true) => Some((SubsectionKind::Responsibilities, Some(label.to_string()), None)),
        // Unknown label followed by text reads as prose, not a header.
        (None, false) => None,
    }
}

struct OpenEntry {
    entry: ParsedExperienceEntry,
    current: SubsectionKind,
    explicit_header_seen: bool,
}

/// Parses canonical experience text into entries.
pub fn parse_experience(content: &str) -> ExperienceParse {
    let mut parse = ExperienceParse::default();
    let mut open: Option<OpenEntry> = None;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(header) = parse_company_header(line) {
            if let Some(done) = open.take() {
                parse.entries.push(done.entry);
            }
            open = Some(OpenEntry {
                entry: ParsedExperienceEntry {
                    company: header.company,
                    role: header.role,
                    date_range: header.dates,
                    ..Default::default()
                },
                current: SubsectionKind::Responsibilities,
                explicit_header_seen: false,
            });
            continue;
        }

        let Some(state) = open.as_mut() else {
            parse.intro.push(line.to_string());
            continue;
        };

        if let Some((kind, label, inline)) = parse_subsection_header(line) {
            state.current = kind;
            state.explicit_header_seen = true;
            if let Some(label) = label {
                state.entry.push(kind, &format!("**{label}**"));
            }
            if let Some(items) = inline {
                state.entry.push(kind, &items);
            }
            continue;
        }

        if let Some(item) = strip_bullet(line) {
            state.entry.push(state.current, item);
        } else if line.chars().count() >= MIN_ITEM_LEN || state.explicit_header_seen {
            state.entry.push(state.current, line);
        } else {
            state.entry.meta.push(line.to_string());
        }
    }

    if let Some(done) = open.take() {
        parse.entries.push(done.entry);
    }
    parse
}

pub fn format_experience(content: &str) -> FormatResult {
    if content.trim().is_empty() {
        return Err(FormatError::EmptyContent);
    }

    let parse = parse_experience(content);
    if parse.entries.is_empty() {
        return Err(FormatError::NoEntries("experience"));
    }

    let mut html = String::new();
    if !parse.intro.is_empty() {
        html.push_str(&format!(
            "<p class=\"experience-intro\">{}</p>",
            inline_markup(&parse.intro.join(" "))
        ));
    }
    for entry in &parse.entries {
        html.push_str(&render_entry(entry));
    }
    Ok(Markup(html))
}

fn render_entry(entry: &ParsedExperienceEntry) -> String {
    let mut html = String::from("<div class=\"experience-entry\">");

    html.push_str(&format!(
        "<div class=\"experience-header\"><div class=\"experience-heading\"><span class=\"experience-company\">{}</span>",
        escape_html(&entry.company)
    ));
    if !entry.role.is_empty() {
        html.push_str(&format!(
            "<span class=\"experience-role\">{}</span>",
            escape_html(&entry.role)
        ));
    }
    html.push_str(&format!(
        "</div><span class=\"experience-dates\">{}</span></div>",
        escape_html(&entry.date_range)
    ));

    if !entry.meta.is_empty() {
        html.push_str(&format!(
            "<div class=\"experience-meta\">{}</div>",
            escape_html(&entry.meta.join(" · "))
        ));
    }

    for (kind, items) in [
        (SubsectionKind::Responsibilities, &entry.responsibilities),
        (SubsectionKind::Achievements, &entry.achievements),
    ] {
        if items.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "<div class=\"experience-block\"><h4 class=\"experience-block-title\">{}</h4><ul>",
            kind.title()
        ));
        for item in items {
            html.push_str(&format!("<li>{}</li>", inline_markup(item)));
        }
        html.push_str("</ul></div>");
    }

    if !entry.technical_environment.is_empty() {
        html.push_str(&format!(
            "<div class=\"experience-block tech-environment\"><h4 class=\"experience-block-title\">{}</h4><div class=\"tech-tags\">",
            SubsectionKind::TechnicalEnvironment.title()
        ));
        for tag in &entry.technical_environment {
            html.push_str(&format!("<span class=\"tech-tag\">{}</span>", inline_markup(tag)));
        }
        html.push_str("</div></div>");
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::normalizer::normalize;
    use crate::models::segment::FormattingMode;

    #[test]
    fn test_reference_entry_parses() {
        let parse = parse_experience("Acme Corp - Senior Engineer 2019 - 2022\n• Built X\n• Led Y");
        assert_eq!(parse.entries.len(), 1);
        let entry = &parse.entries[0];
        assert_eq!(entry.company, "Acme Corp");
        assert!(entry.role.contains("Senior Engineer"), "role was {:?}", entry.role);
        assert!(entry.date_range.contains("2019"));
        assert!(entry.date_range.contains("2022"));
        assert_eq!(entry.responsibilities, vec!["Built X", "Led Y"]);
    }

    #[test]
    fn test_header_with_months_and_present() {
        let h = parse_company_header("Globex – Lead Developer (Mar 2020 - Present)").unwrap();
        assert_eq!(h.company, "Globex");
        assert_eq!(h.role, "Lead Developer");
        assert_eq!(h.dates, "Mar 2020 - Present");
    }

    #[test]
    fn test_role_word_is_not_mistaken_for_a_month() {
        let h = parse_company_header("Initech - Marketing Manager 2015 - 2018").unwrap();
        assert_eq!(h.role, "Marketing Manager");
        assert_eq!(h.dates, "2015 - 2018");
    }

    #[test]
    fn test_header_fallback_when_range_regex_misses() {
        let h = parse_company_header("Umbrella - Analyst 2017ish").unwrap();
        assert_eq!(h.company, "Umbrella");
        assert_eq!(h.role, "Analyst");
        assert_eq!(h.dates, "2017ish");
    }

    #[test]
    fn test_bulleted_and_yearless_lines_are_not_headers() {
        assert!(parse_company_header("• Acme - Engineer 2019 - 2022").is_none());
        assert!(parse_company_header("Acme - Engineer").is_none());
        assert!(parse_company_header("Moved data in 2019 - then rebuilt the pipeline").is_none());
    }

    #[test]
    fn test_bold_header_markers_are_stripped() {
        let h = parse_company_header("**Acme Corp** - Engineer 2019 - 2022").unwrap();
        assert_eq!(h.company, "Acme Corp");
    }

    #[test]
    fn test_subsections_route_items_by_keyword() {
        let content = "Acme - Engineer 2019 - 2022\n\
            Key Achievements:\n\
            • Cut latency by 40%\n\
            **Technical Environment**\n\
            Rust, Tokio, PostgreSQL\n\
            Responsibilities:\n\
            - Owned the billing service";
        let parse = parse_experience(content);
        let entry = &parse.entries[0];
        assert_eq!(entry.achievements, vec!["Cut latency by 40%"]);
        assert_eq!(entry.technical_environment, vec!["Rust", "Tokio", "PostgreSQL"]);
        assert_eq!(entry.responsibilities, vec!["Owned the billing service"]);
    }

    #[test]
    fn test_bulleted_bold_label_opens_subsection() {
        let raw = "Acme - Engineer 2019 - 2022\n• **Key Achievements:**\n• Cut costs 30%\n• **Client Projects**";
        let parse = parse_experience(&normalize(raw, FormattingMode::Paragraph));
        let entry = &parse.entries[0];
        assert_eq!(entry.achievements, vec!["Cut costs 30%", "**Client Projects**"]);
        assert!(entry.responsibilities.is_empty());
    }

    #[test]
    fn test_inline_subsection_items() {
        let parse = parse_experience("Acme - Engineer 2019 - 2022\nTech Stack: Go, Kafka");
        assert_eq!(parse.entries[0].technical_environment, vec!["Go", "Kafka"]);
    }

    #[test]
    fn test_unbulleted_long_line_goes_to_default_subsection() {
        let parse = parse_experience(
            "Acme - Engineer 2019 - 2022\n\nDesigned the event ingestion platform\n\nShipped v2",
        );
        let entry = &parse.entries[0];
        assert_eq!(entry.responsibilities, vec!["Designed the event ingestion platform", "Shipped v2"]);
    }

    #[test]
    fn test_short_line_before_any_header_is_meta() {
        let parse = parse_experience("Acme - Engineer 2019 - 2022\nParis\n• Built X");
        let entry = &parse.entries[0];
        assert_eq!(entry.meta, vec!["Paris"]);
        assert_eq!(entry.responsibilities, vec!["Built X"]);
    }

    #[test]
    fn test_unknown_bold_label_is_kept_as_item() {
        let parse = parse_experience("Acme - Engineer 2019 - 2022\n**Client Projects**\n• Portal");
        assert_eq!(
            parse.entries[0].responsibilities,
            vec!["**Client Projects**", "Portal"]
        );
    }

    #[test]
    fn test_multiple_entries_and_intro() {
        let content = "Ten years building payment systems\n\
            Acme - Engineer 2019 - 2022\n• Built X\n\
            Globex - Intern 2018\n• Tested Y";
        let parse = parse_experience(content);
        assert_eq!(parse.intro, vec!["Ten years building payment systems"]);
        assert_eq!(parse.entries.len(), 2);
        assert_eq!(parse.entries[1].company, "Globex");
        assert_eq!(parse.entries[1].date_range, "2018");
        assert_eq!(parse.entries[1].responsibilities, vec!["Tested Y"]);
    }

    #[test]
    fn test_format_experience_renders_entry_card() {
        let html = format_experience("Acme Corp - Senior Engineer 2019 - 2022\n• Built <X>")
            .unwrap()
            .into_string();
        assert!(html.contains("<span class=\"experience-company\">Acme Corp</span>"));
        assert!(html.contains("Key Responsibilities"));
        assert!(html.contains("<li>Built &lt;X&gt;</li>"));
    }

    #[test]
    fn test_format_experience_errors_without_entries() {
        assert_eq!(format_experience(""), Err(FormatError::EmptyContent));
        assert_eq!(
            format_experience("Just prose"),
            Err(FormatError::NoEntries("experience"))
        );
    }
}
