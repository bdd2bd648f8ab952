//! Client for the PDF-to-DOCX conversion service: the convert round trip,
//! the artifact fetch, and the trait seam for the external document
//! renderer used by the preview.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use shared::{domain::docx_output_filename, protocol::ConvertResponse};
use tracing::{info, warn};
use url::Url;

pub mod error;

pub use error::{ConvertError, CONVERSION_FAILED_FALLBACK, UNKNOWN_ERROR_FALLBACK};

/// File handed to the conversion service.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Converted document fetched back from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedArtifact {
    pub bytes: Vec<u8>,
    /// Download URL resolved against the server base, suitable for display
    /// and for the clipboard.
    pub download_url: String,
    /// Source filename with its extension swapped to `.docx`.
    pub output_filename: String,
}

/// Markup produced by the external document renderer: the `value` is HTML
/// markup, `messages` are advisory notes emitted during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkup {
    pub value: String,
    pub messages: Vec<String>,
}

/// External document-to-markup collaborator driving the inline preview.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, bytes: &[u8]) -> Result<RenderedMarkup>;
}

/// Default wiring when no renderer has been integrated; every render
/// attempt fails and the preview degrades to a non-fatal notice.
pub struct MissingDocumentRenderer;

#[async_trait]
impl DocumentRenderer for MissingDocumentRenderer {
    async fn render(&self, _bytes: &[u8]) -> Result<RenderedMarkup> {
        Err(anyhow!("document renderer is unavailable"))
    }
}

pub struct ConversionClient {
    http: Client,
    server_url: String,
}

impl ConversionClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            server_url,
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Runs the full conversion round trip: post the document as a
    /// multipart form, then fetch the converted artifact's bytes from the
    /// download URL the service hands back.
    ///
    /// The two requests are sequential; there are no retries and no
    /// timeout beyond the HTTP client's defaults.
    pub async fn convert(&self, upload: DocumentUpload) -> Result<ConvertedArtifact, ConvertError> {
        let output_filename = docx_output_filename(&upload.filename);
        info!(
            filename = %upload.filename,
            size_bytes = upload.bytes.len(),
            "converting document"
        );

        let media_type = upload
            .media_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&media_type)
            .map_err(|source| ConvertError::Transport { source })?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.server_url))
            .multipart(form)
            .send()
            .await
            .map_err(|source| ConvertError::Transport { source })?;

        let status = response.status();
        // A body that is not valid JSON is treated like one with no fields.
        let body: ConvertResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            let message = body
                .error
                .unwrap_or_else(|| CONVERSION_FAILED_FALLBACK.to_string());
            warn!(status = status.as_u16(), message = %message, "conversion refused");
            return Err(ConvertError::Rejected { message });
        }

        let Some(download_url) = body.download_url else {
            let message = body
                .error
                .unwrap_or_else(|| UNKNOWN_ERROR_FALLBACK.to_string());
            warn!(message = %message, "conversion response lacked a download url");
            return Err(ConvertError::Rejected { message });
        };

        let artifact_url = self.resolve_download_url(&download_url)?;
        let bytes = self
            .http
            .get(artifact_url.clone())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| ConvertError::ArtifactFetch { source })?
            .bytes()
            .await
            .map_err(|source| ConvertError::ArtifactFetch { source })?;

        info!(
            url = %artifact_url,
            size_bytes = bytes.len(),
            "fetched converted artifact"
        );

        Ok(ConvertedArtifact {
            bytes: bytes.to_vec(),
            download_url: artifact_url.to_string(),
            output_filename,
        })
    }

    /// The service may return either an absolute URL or a path relative to
    /// its own base.
    fn resolve_download_url(&self, download_url: &str) -> Result<Url, ConvertError> {
        let base = Url::parse(&self.server_url).map_err(|source| {
            ConvertError::InvalidDownloadUrl {
                url: self.server_url.clone(),
                source,
            }
        })?;
        base.join(download_url)
            .map_err(|source| ConvertError::InvalidDownloadUrl {
                url: download_url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;
