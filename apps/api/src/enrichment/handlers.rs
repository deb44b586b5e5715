//! Axum route handlers for the Enrichment API.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::enrichment::orchestrator::{require_success, TaskResult};
use crate::enrichment::{EnrichmentMode, EnrichmentTask};
use crate::errors::AppError;
use crate::models::candidate::{CandidateProfile, JobContext};
use crate::models::segment::{Priority, SemanticType};
use crate::state::AppState;

const MAX_SECTIONS_PER_BATCH: usize = 16;
const MAX_BATCH_TIMEOUT: Duration = Duration::from_secs(120);

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SectionRequest {
    pub section_type: SemanticType,
    #[serde(default)]
    pub mode: EnrichmentMode,
    pub existing_content: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Deserialize)]
pub struct EnrichmentRequest {
    #[serde(default)]
    pub candidate: CandidateProfile,
    pub job_context: Option<JobContext>,
    pub sections: Vec<SectionRequest>,
    /// Batch priority against other in-flight batches.
    #[serde(default)]
    pub priority: Priority,
    /// Overrides the configured batch deadline.
    pub timeout_ms: Option<u64>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrichmentResponse {
    pub batch_id: Uuid,
    pub results: Vec<TaskResult>,
    pub succeeded: usize,
    pub failed: usize,
}

impl EnrichmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.sections.is_empty() {
            return Err(AppError::Validation("sections cannot be empty".to_string()));
        }
        if self.sections.len() > MAX_SECTIONS_PER_BATCH {
            return Err(AppError::Validation(format!(
                "at most {MAX_SECTIONS_PER_BATCH} sections per request"
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(AppError::Validation("timeout_ms must be positive".to_string()));
        }
        for (i, section) in self.sections.iter().enumerate() {
            let has_content = section
                .existing_content
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
            if section.mode.needs_existing_content() && !has_content {
                return Err(AppError::Validation(format!(
                    "sections[{i}]: mode '{}' requires existing_content",
                    section.mode.as_str()
                )));
            }
        }
        Ok(())
    }

    fn batch_timeout(&self, default: Duration) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(default)
            .min(MAX_BATCH_TIMEOUT)
    }

    /// Splits the request into tasks sharing one candidate and job context.
    fn into_tasks(self) -> Vec<EnrichmentTask> {
        let candidate = Arc::new(self.candidate);
        let job_context = self.job_context.map(Arc::new);
        let session_id = self.session_id;

        self.sections
            .into_iter()
            .map(|section| EnrichmentTask {
                section_type: section.section_type,
                candidate: Arc::clone(&candidate),
                job_context: job_context.clone(),
                mode: section.mode,
                existing_content: section.existing_content,
                session_id: session_id.clone(),
                priority: section.priority,
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/enrichment
///
/// Generates every requested section concurrently. Results come back in
/// request order; sections that failed or missed the deadline carry an error.
/// Returns 502 ENRICHMENT_FAILED when no section succeeded.
pub async fn handle_enrich(
    State(state): State<AppState>,
    Json(request): Json<EnrichmentRequest>,
) -> Result<Json<EnrichmentResponse>, AppError> {
    request.validate()?;

    let priority = request.priority;
    let timeout = request.batch_timeout(state.config.enrichment_batch_timeout);
    let handle = state.orchestrator.submit_batch(request.into_tasks(), priority);
    let batch_id = handle.batch_id;
    let states = handle.task_states();

    let results = state.orchestrator.await_batch(handle, timeout).await;
    debug!("Enrichment batch {batch_id} task states: {:?}", states.snapshot());
    require_success(&results)?;

    let succeeded = results.iter().filter(|r| r.success).count();
    Ok(Json(EnrichmentResponse {
        batch_id,
        failed: results.len() - succeeded,
        succeeded,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: serde_json::Value) -> EnrichmentRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = request(serde_json::json!({
            "candidate": {"name": "Jane"},
            "sections": [{"section_type": "summary"}]
        }));
        assert_eq!(req.priority, Priority::Medium);
        assert_eq!(req.sections[0].mode, EnrichmentMode::Generate);
        assert!(req.validate().is_ok());
        assert_eq!(req.batch_timeout(Duration::from_secs(45)), Duration::from_secs(45));
    }

    #[test]
    fn test_improve_without_content_is_rejected() {
        let req = request(serde_json::json!({
            "sections": [{"section_type": "skills", "mode": "improve", "existing_content": "  "}]
        }));
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_sections_and_zero_timeout_are_rejected() {
        let empty = request(serde_json::json!({"sections": []}));
        assert!(empty.validate().is_err());

        let zero = request(serde_json::json!({
            "sections": [{"section_type": "summary"}],
            "timeout_ms": 0
        }));
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_timeout_is_capped() {
        let req = request(serde_json::json!({
            "sections": [{"section_type": "summary"}],
            "timeout_ms": 10_000_000
        }));
        assert_eq!(req.batch_timeout(Duration::from_secs(45)), MAX_BATCH_TIMEOUT);
    }

    #[test]
    fn test_tasks_share_candidate_and_keep_order() {
        let req = request(serde_json::json!({
            "candidate": {"name": "Jane"},
            "job_context": {"title": "Engineer"},
            "session_id": "s-1",
            "sections": [
                {"section_type": "summary", "priority": "high"},
                {"section_type": "experience", "mode": "expand", "existing_content": "Acme"}
            ]
        }));
        let tasks = req.into_tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].section_type, SemanticType::Summary);
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].mode, EnrichmentMode::Expand);
        assert!(Arc::ptr_eq(&tasks[0].candidate, &tasks[1].candidate));
        assert_eq!(tasks[1].session_id.as_deref(), Some("s-1"));
    }
}
