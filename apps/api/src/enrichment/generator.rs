//! Section generators.
//!
//! The orchestrator drives any `SectionGenerator`; `AppState` carries the
//! LLM-backed one. Tests swap in in-memory generators.

use async_trait::async_trait;
use tracing::debug;

use crate::enrichment::prompts::{build_section_prompt, SECTION_SYSTEM};
use crate::enrichment::EnrichmentTask;
use crate::llm_client::{LlmClient, LlmError};

#[async_trait]
pub trait SectionGenerator: Send + Sync {
    /// Produces the section text for `task`, in the plain-text conventions the
    /// document formatters understand.
    async fn generate(&self, task: &EnrichmentTask) -> Result<String, LlmError>;
}

pub struct LlmSectionGenerator {
    llm: LlmClient,
}

impl LlmSectionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SectionGenerator for LlmSectionGenerator {
    async fn generate(&self, task: &EnrichmentTask) -> Result<String, LlmError> {
        let prompt = build_section_prompt(task);
        debug!(
            "Generating {} section ({}), prompt {} chars",
            task.section_type.slug(),
            task.mode.as_str(),
            prompt.len()
        );
        let text = self.llm.call_text(&prompt, SECTION_SYSTEM).await?;
        Ok(strip_echoed_title(task, &text).to_string())
    }
}

/// Models sometimes repeat the section name as a first line despite being
/// told not to; drop it so the composer's `<h2>` is not duplicated.
fn strip_echoed_title<'a>(task: &EnrichmentTask, text: &'a str) -> &'a str {
    let Some((first, rest)) = text.split_once('\n') else {
        return text;
    };
    let heading = first
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim_end_matches(':')
        .to_lowercase();
    let slug = task.section_type.slug().replace('-', " ");
    if heading == slug || heading == format!("{slug}s") {
        rest.trim_start()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::candidate::CandidateProfile;
    use crate::models::segment::SemanticType;

    fn task(section: SemanticType) -> EnrichmentTask {
        EnrichmentTask::new(section, Arc::new(CandidateProfile::default()))
    }

    #[test]
    fn test_echoed_title_is_removed() {
        let t = task(SemanticType::Skills);
        assert_eq!(strip_echoed_title(&t, "## Skills\n**Cloud**\n• AWS"), "**Cloud**\n• AWS");
        assert_eq!(strip_echoed_title(&t, "**Skills:**\n• Rust"), "• Rust");

        let summary = task(SemanticType::ExperienceSummary);
        assert_eq!(
            strip_echoed_title(&summary, "Experience Summary\nAcme - Engineer 2019 - 2022"),
            "Acme - Engineer 2019 - 2022"
        );
    }

    #[test]
    fn test_body_text_is_left_alone() {
        let t = task(SemanticType::Skills);
        assert_eq!(strip_echoed_title(&t, "**Cloud**\n• AWS"), "**Cloud**\n• AWS");
        assert_eq!(strip_echoed_title(&t, "Skills"), "Skills");
    }
}
