//! Document shells. `classic` and `partner` share one stylesheet and one page
//! skeleton; they differ only in the constants of their `ShellStyle`.

use serde::{Deserialize, Serialize};

use crate::document::markup::escape_html;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "snake_case")]
pub enum TemplateKind {
    #[default]
    Classic,
    Partner,
}

impl TemplateKind {
    /// Case-insensitive; anything unrecognised is `Classic`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "partner" => TemplateKind::Partner,
            _ => TemplateKind::Classic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Classic => "classic",
            TemplateKind::Partner => "partner",
        }
    }

    pub fn style(self) -> &'static ShellStyle {
        match self {
            TemplateKind::Classic => &CLASSIC,
            TemplateKind::Partner => &PARTNER,
        }
    }
}

impl From<String> for TemplateKind {
    fn from(name: String) -> Self {
        TemplateKind::parse(&name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAlign {
    Left,
    Center,
}

impl HeaderAlign {
    fn css(self) -> &'static str {
        match self {
            HeaderAlign::Left => "left",
            HeaderAlign::Center => "center",
        }
    }
}

/// Where the brand mark sits on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandPlacement {
    /// Logo block in the top-right corner of the header.
    HeaderLogo,
    /// Text wordmark in the page footer.
    FooterWordmark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellStyle {
    pub accent_color: &'static str,
    pub text_color: &'static str,
    pub muted_color: &'static str,
    pub rule_color: &'static str,
    pub tag_background: &'static str,
    pub body_font: &'static str,
    pub heading_font: &'static str,
    pub header_align: HeaderAlign,
    pub brand: BrandPlacement,
    pub brand_label: &'static str,
}

pub const CLASSIC: ShellStyle = ShellStyle {
    accent_color: "#1f3a5f",
    text_color: "#222222",
    muted_color: "#5f6b7a",
    rule_color: "#c9d3df",
    tag_background: "#e8eef5",
    body_font: "'Helvetica Neue', Arial, sans-serif",
    heading_font: "'Helvetica Neue', Arial, sans-serif",
    header_align: HeaderAlign::Left,
    brand: BrandPlacement::FooterWordmark,
    brand_label: "Competence File",
};

pub const PARTNER: ShellStyle = ShellStyle {
    accent_color: "#8a1538",
    text_color: "#1a1a1a",
    muted_color: "#6b6b6b",
    rule_color: "#e3cfd6",
    tag_background: "#f6e9ee",
    body_font: "Georgia, 'Times New Roman', serif",
    heading_font: "'Gill Sans', 'Trebuchet MS', sans-serif",
    header_align: HeaderAlign::Center,
    brand: BrandPlacement::HeaderLogo,
    brand_label: "Partner Profile",
};

const STYLESHEET: &str = r#"
@page { size: A4; margin: 18mm 16mm; }
body { font-family: {{body_font}}; color: {{text_color}}; font-size: 10.5pt; line-height: 1.45; margin: 0; }
h1, h2, h3, h4, h5 { font-family: {{heading_font}}; color: {{accent_color}}; margin: 0; }
.cv-header { text-align: {{header_align}}; border-bottom: 2px solid {{accent_color}}; padding-bottom: 10px; margin-bottom: 14px; position: relative; }
.candidate-name { font-size: 22pt; }
.candidate-title { color: {{muted_color}}; font-size: 12pt; margin-top: 2px; }
.candidate-contact, .contact-info, .experience-duration { color: {{muted_color}}; font-size: 9.5pt; }
.contact-item + .contact-item::before { content: " | "; }
.brand-logo { position: absolute; top: 0; right: 0; font-family: {{heading_font}}; color: {{accent_color}}; font-weight: bold; letter-spacing: 0.08em; text-transform: uppercase; }
.brand-wordmark { margin-top: 18px; padding-top: 6px; border-top: 1px solid {{rule_color}}; color: {{muted_color}}; font-size: 8pt; text-align: right; }
.cv-section { margin-bottom: 14px; page-break-inside: avoid; }
.cv-section > h2 { font-size: 12pt; text-transform: uppercase; border-bottom: 1px solid {{rule_color}}; padding-bottom: 3px; margin-bottom: 8px; }
.summary-opening { font-weight: 600; }
.experience-entry, .experience-card { margin-bottom: 10px; }
.experience-header, .experience-card-header { display: flex; justify-content: space-between; }
.experience-company { font-weight: bold; }
.experience-dates, .experience-meta { color: {{muted_color}}; }
.experience-block-title, .skill-category-title, .static-group-title { font-size: 10pt; margin: 6px 0 3px; }
.skill-tag, .tech-tag { display: inline-block; background: {{tag_background}}; border-radius: 3px; padding: 1px 6px; margin: 0 4px 4px 0; }
.skills-grid, .certifications-grid, .languages-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 6px 18px; }
.education-item, .certification-item, .language-item, .static-item { margin-bottom: 4px; }
.cert-provider, .cert-date, .language-level { color: {{muted_color}}; margin-left: 6px; }
.level-native, .level-fluent { color: {{accent_color}}; font-weight: bold; }
"#;

/// The shared stylesheet with the shell's constants filled in.
pub fn stylesheet(style: &ShellStyle) -> String {
    STYLESHEET
        .replace("{{accent_color}}", style.accent_color)
        .replace("{{text_color}}", style.text_color)
        .replace("{{muted_color}}", style.muted_color)
        .replace("{{rule_color}}", style.rule_color)
        .replace("{{tag_background}}", style.tag_background)
        .replace("{{body_font}}", style.body_font)
        .replace("{{heading_font}}", style.heading_font)
        .replace("{{header_align}}", style.header_align.css())
}

/// Wraps already-rendered header and section markup into one self-contained
/// HTML document.
pub fn render_shell(kind: TemplateKind, title: &str, header_html: &str, body_html: &str) -> String {
    let style = kind.style();
    let brand = escape_html(style.brand_label);
    let (logo, wordmark) = match style.brand {
        BrandPlacement::HeaderLogo => (format!("<div class=\"brand-logo\">{brand}</div>"), String::new()),
        BrandPlacement::FooterWordmark => (String::new(), format!("<footer class=\"brand-wordmark\">{brand}</footer>")),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{css}</style>\n</head>\n<body class=\"template-{kind}\">\n<header class=\"cv-header\">{logo}{header_html}</header>\n<main class=\"cv-body\">{body_html}</main>\n{wordmark}\n</body>\n</html>\n",
        title = escape_html(title),
        css = stylesheet(style),
        kind = kind.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_template_falls_back_to_classic() {
        assert_eq!(TemplateKind::parse("partner"), TemplateKind::Partner);
        assert_eq!(TemplateKind::parse(" PARTNER "), TemplateKind::Partner);
        assert_eq!(TemplateKind::parse("modern"), TemplateKind::Classic);
        assert_eq!(TemplateKind::parse(""), TemplateKind::Classic);

        let kind: TemplateKind = serde_json::from_value(serde_json::json!("fancy")).unwrap();
        assert_eq!(kind, TemplateKind::Classic);
    }

    #[test]
    fn test_stylesheet_has_no_unfilled_placeholders() {
        for kind in [TemplateKind::Classic, TemplateKind::Partner] {
            let css = stylesheet(kind.style());
            assert!(!css.contains("{{"), "{kind:?}");
        }
    }

    #[test]
    fn test_shells_differ_in_styling_and_brand_placement() {
        let classic = render_shell(TemplateKind::Classic, "Jane", "<h1>Jane</h1>", "");
        let partner = render_shell(TemplateKind::Partner, "Jane", "<h1>Jane</h1>", "");

        assert!(classic.contains(CLASSIC.accent_color));
        assert!(classic.contains("text-align: left"));
        assert!(classic.contains("<footer class=\"brand-wordmark\">"));
        assert!(!classic.contains("<div class=\"brand-logo\">"));

        assert!(partner.contains(PARTNER.accent_color));
        assert!(partner.contains("text-align: center"));
        assert!(partner.contains("<div class=\"brand-logo\">"));
        assert!(!partner.contains("<footer class=\"brand-wordmark\">"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_shell(TemplateKind::Classic, "<Jane>", "", "");
        assert!(html.contains("<title>&lt;Jane&gt;</title>"));
    }
}
