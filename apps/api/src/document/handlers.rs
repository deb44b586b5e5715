//! Axum route handlers for the Document API.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::document::composer::compose_document;
use crate::document::templates::TemplateKind;
use crate::errors::AppError;
use crate::models::candidate::CandidateProfile;
use crate::models::segment::Segment;
use crate::render::{render_or_fallback, RenderOutput};
use crate::state::AppState;

pub const IDEMPOTENCY_KEY: &str = "idempotency-key";
pub const RENDER_FALLBACK_HEADER: &str = "x-render-fallback";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    #[serde(default)]
    pub candidate: CandidateProfile,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub template: TemplateKind,
    /// Fail instead of falling back to HTML when no PDF can be produced.
    #[serde(default)]
    pub require_pdf: bool,
}

impl DocumentRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.segments.is_empty() && self.candidate.name.trim().is_empty() {
            return Err(AppError::Validation(
                "a document needs segments or a candidate name".to_string(),
            ));
        }
        Ok(())
    }
}

/// Composes on a blocking thread; formatting is CPU-bound regex work.
async fn compose_html(request: DocumentRequest) -> Result<String, AppError> {
    let DocumentRequest {
        candidate,
        segments,
        template,
        ..
    } = request;
    let segment_count = segments.len();

    let html = tokio::task::spawn_blocking(move || compose_document(&candidate, segments, template).to_html())
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed composing document: {e}")))?;

    info!(
        "Composed {} document from {segment_count} segment(s), {} bytes",
        template.as_str(),
        html.len()
    );
    Ok(html)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents/html
///
/// Classifies, normalizes, formats, and composes the segments into one
/// self-contained HTML document.
pub async fn handle_render_html(Json(request): Json<DocumentRequest>) -> Result<Html<String>, AppError> {
    request.validate()?;
    Ok(Html(compose_html(request).await?))
}

/// POST /api/v1/documents/pdf
///
/// Same pipeline as the HTML endpoint, then hands the document to the external
/// renderer. Returns the HTML with `X-Render-Fallback` when no PDF could be
/// produced. An `Idempotency-Key` header rejects duplicates while the key is live.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    request.validate()?;

    let key = headers
        .get(IDEMPOTENCY_KEY)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);

    if let Some(key) = &key {
        if !state.dedup.try_acquire(key) {
            return Err(AppError::Conflict(format!(
                "a request with idempotency key '{key}' was already received"
            )));
        }
    }

    let result = render_pdf(&state, request).await;
    if result.is_err() {
        if let Some(key) = &key {
            state.dedup.release(key);
        }
    }
    result
}

async fn render_pdf(state: &AppState, request: DocumentRequest) -> Result<Response, AppError> {
    let require_pdf = request.require_pdf;
    let html = compose_html(request).await?;

    match render_or_fallback(state.renderer.as_deref(), html).await {
        RenderOutput::Pdf(pdf) => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, "inline; filename=\"competence-file.pdf\""),
            ],
            pdf,
        )
            .into_response()),
        RenderOutput::HtmlFallback(_) if require_pdf => Err(AppError::Render(
            "PDF rendering is unavailable for this request".to_string(),
        )),
        RenderOutput::HtmlFallback(html) => Ok(([(RENDER_FALLBACK_HEADER, "html")], Html(html)).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_upstream_segment_shape() {
        let request: DocumentRequest = serde_json::from_value(serde_json::json!({
            "candidate": {"name": "Jane"},
            "segments": [{"title": "Skills", "content": "Rust", "order": 1}],
            "template": "unknown"
        }))
        .unwrap();
        assert_eq!(request.segments.len(), 1);
        assert_eq!(request.template, TemplateKind::Classic);
        assert!(!request.require_pdf);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_request_is_rejected() {
        let request: DocumentRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_compose_html_runs_the_pipeline() {
        let request: DocumentRequest = serde_json::from_value(serde_json::json!({
            "candidate": {"name": "Jane"},
            "segments": [{"title": "Languages", "content": "French - Native", "order": 1}],
            "template": "partner"
        }))
        .unwrap();
        let html = compose_html(request).await.unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("template-partner"));
        assert!(html.contains("level-native"));
    }
}
