pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::document::handlers as documents;
use crate::enrichment::handlers as enrichment;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route("/api/v1/documents/html", post(documents::handle_render_html))
        .route("/api/v1/documents/pdf", post(documents::handle_render_pdf))
        // Enrichment API
        .route("/api/v1/enrichment", post(enrichment::handle_enrich))
        .with_state(state)
}
