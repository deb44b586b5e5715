//! External HTML→PDF renderer adapter.
//!
//! Rasterization happens in a separate service. This module only ships the
//! final HTML over HTTP and hands back the PDF bytes, or degrades to the HTML
//! itself when the renderer is unavailable.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("renderer returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("renderer returned an empty document")]
    EmptyBody,
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Bytes, RenderError>;
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    html: &'a str,
    page_size: &'a str,
    wait_for_resources: bool,
}

/// Renderer reached over HTTP. POSTs the document as JSON and expects raw
/// PDF bytes back.
#[derive(Clone)]
pub struct HttpPdfRenderer {
    client: Client,
    url: String,
}

impl HttpPdfRenderer {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(RENDER_TIMEOUT).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(&self, html: &str) -> Result<Bytes, RenderError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RenderRequest {
                html,
                page_size: "A4",
                wait_for_resources: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RenderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let pdf = response.bytes().await?;
        if pdf.is_empty() {
            return Err(RenderError::EmptyBody);
        }
        debug!("Renderer returned {} bytes", pdf.len());
        Ok(pdf)
    }
}

#[derive(Debug)]
pub enum RenderOutput {
    Pdf(Bytes),
    /// The renderer failed or is not configured; carries the original HTML.
    HtmlFallback(String),
}

/// Renders `html`, returning the HTML itself when no PDF could be produced.
pub async fn render_or_fallback(renderer: Option<&dyn PdfRenderer>, html: String) -> RenderOutput {
    let Some(renderer) = renderer else {
        debug!("No renderer configured; returning HTML");
        return RenderOutput::HtmlFallback(html);
    };

    match renderer.render(&html).await {
        Ok(pdf) => RenderOutput::Pdf(pdf),
        Err(e) => {
            warn!("PDF rendering failed ({e}); returning HTML");
            RenderOutput::HtmlFallback(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRenderer(Result<&'static [u8], ()>);

    #[async_trait]
    impl PdfRenderer for FixedRenderer {
        async fn render(&self, _html: &str) -> Result<Bytes, RenderError> {
            match self.0 {
                Ok(bytes) if bytes.is_empty() => Err(RenderError::EmptyBody),
                Ok(bytes) => Ok(Bytes::from_static(bytes)),
                Err(()) => Err(RenderError::Status {
                    status: 503,
                    message: "busy".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_successful_render_returns_pdf() {
        let renderer = FixedRenderer(Ok(&b"%PDF-1.7"[..]));
        match render_or_fallback(Some(&renderer), "<html></html>".to_string()).await {
            RenderOutput::Pdf(bytes) => assert_eq!(&bytes[..], b"%PDF-1.7"),
            other => panic!("expected pdf, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_render_falls_back_to_html() {
        for renderer in [FixedRenderer(Err(())), FixedRenderer(Ok(&b""[..]))] {
            match render_or_fallback(Some(&renderer), "<p>doc</p>".to_string()).await {
                RenderOutput::HtmlFallback(html) => assert_eq!(html, "<p>doc</p>"),
                other => panic!("expected fallback, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_renderer_falls_back_to_html() {
        let out = render_or_fallback(None, "<p>doc</p>".to_string()).await;
        assert!(matches!(out, RenderOutput::HtmlFallback(html) if html == "<p>doc</p>"));
    }

    #[test]
    fn test_render_request_shape() {
        let body = serde_json::to_value(RenderRequest {
            html: "<p>x</p>",
            page_size: "A4",
            wait_for_resources: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"html": "<p>x</p>", "page_size": "A4", "wait_for_resources": true})
        );
    }
}
