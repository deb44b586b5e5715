use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resume-section category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Header,
    Summary,
    Skills,
    Experience,
    ExperienceSummary,
    Education,
    /// Certifications, languages, licenses.
    Static,
    Generic,
}

impl SemanticType {
    /// Kebab-case slug used in CSS class names.
    pub fn slug(self) -> &'static str {
        match self {
            SemanticType::Header => "header",
            SemanticType::Summary => "summary",
            SemanticType::Skills => "skills",
            SemanticType::Experience => "experience",
            SemanticType::ExperienceSummary => "experience-summary",
            SemanticType::Education => "education",
            SemanticType::Static => "static",
            SemanticType::Generic => "generic",
        }
    }
}

/// Structural shape a segment's content is normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingMode {
    Paragraph,
    List,
    Table,
    Columns,
}

/// Shared by segment classification and enrichment scheduling.
/// Ordering: `High > Medium > Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

fn default_visible() -> bool {
    true
}

/// One named, ordered block of resume text awaiting formatting.
///
/// Upstream editors send `{title, content, order}`; the longer field names are
/// accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(alias = "content")]
    pub raw_content: String,
    #[serde(alias = "order", default)]
    pub display_order: i32,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Segment {
    pub fn new(title: impl Into<String>, content: impl Into<String>, display_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            raw_content: content.into(),
            display_order,
            visible: true,
        }
    }
}

/// A segment after classification and normalization.
///
/// `content` holds the canonical (normalized) text; the original text stays on
/// `segment.raw_content`. A reclassified segment is a new value, never a
/// mutation of this one.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedSegment {
    pub segment: Segment,
    pub semantic_type: SemanticType,
    pub formatting_mode: FormattingMode,
    pub priority: Priority,
    pub content: String,
}
