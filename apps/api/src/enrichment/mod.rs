//! Enrichment: AI generation of section text ahead of document composition.
//!
//! Tasks are fanned out through the `orchestrator` worker pool to a pluggable
//! `SectionGenerator`; the default generator calls the LLM client.

pub mod generator;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::candidate::{CandidateProfile, JobContext};
use crate::models::segment::{Priority, SemanticType};

/// What the generator should do with the section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    /// Write the section from the candidate profile alone.
    #[default]
    Generate,
    /// Polish existing text without changing its facts.
    Improve,
    /// Add depth to existing text.
    Expand,
    /// Restate existing text in a different shape.
    Rewrite,
}

impl EnrichmentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrichmentMode::Generate => "generate",
            EnrichmentMode::Improve => "improve",
            EnrichmentMode::Expand => "expand",
            EnrichmentMode::Rewrite => "rewrite",
        }
    }

    /// Every mode other than `generate` works on text the caller already has.
    pub fn needs_existing_content(self) -> bool {
        !matches!(self, EnrichmentMode::Generate)
    }
}

/// One section to generate. Candidate and job context are shared by every
/// task of a batch.
#[derive(Debug, Clone)]
pub struct EnrichmentTask {
    pub section_type: SemanticType,
    pub candidate: Arc<CandidateProfile>,
    pub job_context: Option<Arc<JobContext>>,
    pub mode: EnrichmentMode,
    pub existing_content: Option<String>,
    pub session_id: Option<String>,
    pub priority: Priority,
}

impl EnrichmentTask {
    pub fn new(section_type: SemanticType, candidate: Arc<CandidateProfile>) -> Self {
        Self {
            section_type,
            candidate,
            job_context: None,
            mode: EnrichmentMode::Generate,
            existing_content: None,
            session_id: None,
            priority: Priority::Medium,
        }
    }

    /// Existing content, if it has any non-whitespace text.
    pub fn existing_text(&self) -> Option<&str> {
        self.existing_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
