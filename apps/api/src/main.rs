mod config;
mod dedup;
mod document;
mod enrichment;
mod errors;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dedup::RequestDeduplicator;
use crate::enrichment::generator::LlmSectionGenerator;
use crate::enrichment::orchestrator::EnrichmentOrchestrator;
use crate::llm_client::LlmClient;
use crate::render::{HttpPdfRenderer, PdfRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting competence API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client and the enrichment worker pool
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let orchestrator = EnrichmentOrchestrator::new(
        Arc::new(LlmSectionGenerator::new(llm)),
        config.enrichment_concurrency,
        config.enrichment_task_timeout,
    );

    // External PDF renderer is optional; without it PDF requests return HTML
    let renderer: Option<Arc<dyn PdfRenderer>> = match &config.renderer_url {
        Some(url) => {
            info!("PDF renderer: {url}");
            Some(Arc::new(HttpPdfRenderer::new(url.clone())?))
        }
        None => {
            info!("RENDERER_URL not set; PDF requests will fall back to HTML");
            None
        }
    };

    let dedup = Arc::new(RequestDeduplicator::new(config.dedup_ttl));

    // Build app state
    let state = AppState {
        config: config.clone(),
        orchestrator,
        renderer,
        dedup,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor front-end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
