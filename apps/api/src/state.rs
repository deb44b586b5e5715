use std::sync::Arc;

use crate::config::Config;
use crate::dedup::RequestDeduplicator;
use crate::enrichment::orchestrator::EnrichmentOrchestrator;
use crate::render::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Worker pool for section generation. Holds the LLM-backed generator.
    pub orchestrator: EnrichmentOrchestrator,
    /// External PDF renderer; `None` when `RENDERER_URL` is unset.
    pub renderer: Option<Arc<dyn PdfRenderer>>,
    /// Idempotency-key guard for document requests.
    pub dedup: Arc<RequestDeduplicator>,
}
