use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Worker count of the enrichment pool, shared by all batches.
    pub enrichment_concurrency: usize,
    /// Default `await_batch` deadline when a request sets none.
    pub enrichment_batch_timeout: Duration,
    /// Upper bound on a single generation inside a worker.
    pub enrichment_task_timeout: Duration,
    pub dedup_ttl: Duration,
    /// External HTML→PDF service. Unset means PDF requests return HTML.
    pub renderer_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            enrichment_concurrency: parse_env("ENRICHMENT_CONCURRENCY", 4)?,
            enrichment_batch_timeout: Duration::from_millis(parse_env("ENRICHMENT_BATCH_TIMEOUT_MS", 45_000)?),
            enrichment_task_timeout: Duration::from_millis(parse_env("ENRICHMENT_TASK_TIMEOUT_MS", 60_000)?),
            dedup_ttl: Duration::from_secs(parse_env("DEDUP_TTL_SECS", 30)?),
            renderer_url: std::env::var("RENDERER_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
