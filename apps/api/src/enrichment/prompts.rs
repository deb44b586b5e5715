// Prompt text for section enrichment.
// Output conventions in SECTION_SYSTEM match what the document formatters
// parse: `• ` bullets, `**Bold**` category lines, `Company - Role YYYY - YYYY`
// experience headers.

use crate::enrichment::{EnrichmentMode, EnrichmentTask};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, SCOPE_INSTRUCTION};
use crate::models::candidate::{CandidateProfile, JobContext};
use crate::models::segment::SemanticType;

/// System prompt for section enrichment. Plain text output, no JSON.
pub const SECTION_SYSTEM: &str = "You are an expert writer of professional competence files. \
    You write one resume section at a time as plain text. \
    Use `• ` for bullet points and `**Label**` on its own line for category headings. \
    Do NOT add the section title. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Replace: {grounding_instruction}, {scope_instruction}, {mode_instruction},
///          {section_instruction}, {candidate}, {job_context}, {existing_content}
pub const SECTION_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

{scope_instruction}

TASK:
{mode_instruction}

SECTION FORMAT:
{section_instruction}

CANDIDATE:
{candidate}

TARGET ROLE:
{job_context}

EXISTING CONTENT:
{existing_content}"#;

fn mode_instruction(mode: EnrichmentMode) -> &'static str {
    match mode {
        EnrichmentMode::Generate => {
            "Write this section from the candidate information below. Existing content, if any, is only a hint."
        }
        EnrichmentMode::Improve => {
            "Improve the existing content: tighten wording, fix grammar, strengthen verbs. Keep every fact and keep the structure."
        }
        EnrichmentMode::Expand => {
            "Expand the existing content with more detail drawn from the candidate information. Keep everything already there."
        }
        EnrichmentMode::Rewrite => {
            "Rewrite the existing content from scratch in a clearer, more professional form. Keep the facts, change the phrasing freely."
        }
    }
}

fn section_instruction(section: SemanticType) -> &'static str {
    match section {
        SemanticType::Header => {
            "Two or three short lines: the candidate's headline title and total years of experience (e.g. `12 years of experience`)."
        }
        SemanticType::Summary => {
            "Two or three short paragraphs separated by a blank line. The first paragraph is a one-sentence positioning statement."
        }
        SemanticType::ExperienceSummary => {
            "One line per position: `Company - Role YYYY - YYYY`, most recent first. No bullets."
        }
        SemanticType::Skills => {
            "Group skills under `**Category**` heading lines, one skill per `• ` bullet line below each heading."
        }
        SemanticType::Experience => {
            "For each position a header line `Company - Role Mon YYYY - Mon YYYY` (use `Present` for the current role), \
             then `• ` bullets for responsibilities. Optional `Key Achievements:` and `Technical Environment:` lines \
             may follow, the latter with a comma-separated list."
        }
        SemanticType::Education => "One line per degree: `Degree - Institution (YYYY)`.",
        SemanticType::Static => {
            "One item per line. Certifications as `Name - Issuer (YYYY)`; languages as `Language - Level`."
        }
        SemanticType::Generic => "Short paragraphs or `• ` bullets, whichever suits the content.",
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Renders the candidate profile as labelled plain-text lines.
pub fn describe_candidate(candidate: &CandidateProfile) -> String {
    let mut lines = Vec::new();
    if !candidate.name.trim().is_empty() {
        lines.push(format!("Name: {}", candidate.name.trim()));
    }
    if let Some(title) = non_empty(&candidate.title) {
        lines.push(format!("Title: {title}"));
    }
    if let Some(location) = non_empty(&candidate.location) {
        lines.push(format!("Location: {location}"));
    }
    if !candidate.skills.is_empty() {
        lines.push(format!("Skills: {}", candidate.skills.join(", ")));
    }
    if !candidate.experience.is_empty() {
        lines.push("Experience:".to_string());
        for record in &candidate.experience {
            let dates = record.dates.as_deref().unwrap_or("dates unknown");
            lines.push(format!("- {} - {} ({dates})", record.company, record.role));
            for item in &record.responsibilities {
                lines.push(format!("  • {item}"));
            }
        }
    }
    if !candidate.education.is_empty() {
        lines.push(format!("Education: {}", candidate.education.join("; ")));
    }
    if !candidate.certifications.is_empty() {
        lines.push(format!("Certifications: {}", candidate.certifications.join("; ")));
    }
    if !candidate.languages.is_empty() {
        lines.push(format!("Languages: {}", candidate.languages.join(", ")));
    }

    if lines.is_empty() {
        "(no candidate information provided)".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn describe_job_context(job: Option<&JobContext>) -> String {
    let Some(job) = job else {
        return "(none; write for a general audience)".to_string();
    };
    let mut lines = Vec::new();
    if let Some(title) = non_empty(&job.title) {
        lines.push(format!("Role: {title}"));
    }
    if let Some(description) = non_empty(&job.description) {
        lines.push(format!("Description: {description}"));
    }
    if !job.requirements.is_empty() {
        lines.push(format!("Requirements: {}", job.requirements.join("; ")));
    }
    if !job.skills.is_empty() {
        lines.push(format!("Key skills: {}", job.skills.join(", ")));
    }
    if lines.is_empty() {
        "(none; write for a general audience)".to_string()
    } else {
        lines.push("Emphasise what the candidate has that is relevant to this role.".to_string());
        lines.join("\n")
    }
}

pub fn build_section_prompt(task: &EnrichmentTask) -> String {
    SECTION_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{scope_instruction}", SCOPE_INSTRUCTION)
        .replace("{mode_instruction}", mode_instruction(task.mode))
        .replace("{section_instruction}", section_instruction(task.section_type))
        .replace("{candidate}", &describe_candidate(&task.candidate))
        .replace("{job_context}", &describe_job_context(task.job_context.as_deref()))
        .replace("{existing_content}", task.existing_text().unwrap_or("(none)"))
}
