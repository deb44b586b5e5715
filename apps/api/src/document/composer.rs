//! Document Composer: orders, filters, and formats classified segments, then
//! wraps them in the selected shell.
//!
//! Composition is a pure function of its inputs: the same candidate, segments,
//! and template always yield byte-identical HTML.

use serde::Serialize;
use tracing::debug;

use crate::document::classifier::classify_segment;
use crate::document::formatters::format_or_degrade;
use crate::document::markup::{escape_html, Markup};
use crate::document::templates::{render_shell, TemplateKind};
use crate::models::candidate::CandidateProfile;
use crate::models::segment::{ClassifiedSegment, Segment, SemanticType};

#[derive(Debug, Clone, Serialize)]
pub struct RenderedSection {
    pub semantic_type: SemanticType,
    pub title: String,
    pub html: Markup,
}

impl RenderedSection {
    fn to_html(&self) -> String {
        format!(
            "<section class=\"cv-section section-{}\"><h2>{}</h2>{}</section>",
            self.semantic_type.slug(),
            escape_html(&self.title),
            self.html.as_str()
        )
    }
}

/// A composed document. Built once by `compose_document`, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub title: String,
    pub header_html: Markup,
    pub sections: Vec<RenderedSection>,
    pub template: TemplateKind,
}

impl RenderedDocument {
    pub fn to_html(&self) -> String {
        let body: String = self.sections.iter().map(RenderedSection::to_html).collect();
        render_shell(self.template, &self.title, self.header_html.as_str(), &body)
    }
}

/// Classifies and normalizes visible segments in stable `display_order` order.
pub fn prepare_segments(mut segments: Vec<Segment>) -> Vec<ClassifiedSegment> {
    segments.sort_by_key(|s| s.display_order);
    segments
        .into_iter()
        .filter(|s| s.visible)
        .map(classify_segment)
        .collect()
}

pub fn compose_document(
    candidate: &CandidateProfile,
    segments: Vec<Segment>,
    template: TemplateKind,
) -> RenderedDocument {
    let classified = prepare_segments(segments);

    let (header_segments, body_segments): (Vec<_>, Vec<_>) = classified
        .into_iter()
        .partition(|s| s.semantic_type == SemanticType::Header);

    let sections: Vec<RenderedSection> = body_segments
        .into_iter()
        .filter(|s| !s.content.trim().is_empty())
        .map(|s| RenderedSection {
            html: format_or_degrade(s.semantic_type, &s.content),
            semantic_type: s.semantic_type,
            title: s.segment.title,
        })
        .collect();

    debug!(
        "Composed {} sections with {} header segment(s) on the {} shell",
        sections.len(),
        header_segments.len(),
        template.as_str()
    );

    let title = if candidate.name.trim().is_empty() {
        "Competence File".to_string()
    } else {
        candidate.name.trim().to_string()
    };

    RenderedDocument {
        title,
        header_html: render_header(candidate, &header_segments),
        sections,
        template,
    }
}

/// Candidate identity and contact fields, followed by any header-typed
/// segment content.
fn render_header(candidate: &CandidateProfile, header_segments: &[ClassifiedSegment]) -> Markup {
    let mut html = String::new();

    let name = candidate.name.trim();
    if !name.is_empty() {
        html.push_str(&format!("<h1 class=\"candidate-name\">{}</h1>", escape_html(name)));
    }
    if let Some(title) = candidate.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        html.push_str(&format!("<div class=\"candidate-title\">{}</div>", escape_html(title)));
    }

    let contacts = candidate.contact_fields();
    if !contacts.is_empty() {
        html.push_str("<div class=\"candidate-contact\">");
        for field in contacts {
            html.push_str(&format!("<span class=\"contact-item\">{}</span>", escape_html(field)));
        }
        html.push_str("</div>");
    }

    for segment in header_segments {
        if segment.content.trim().is_empty() {
            continue;
        }
        html.push_str(format_or_degrade(SemanticType::Header, &segment.content).as_str());
    }

    Markup(html)
}
