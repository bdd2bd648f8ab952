//! Error taxonomy for the conversion round trip.

use thiserror::Error;

/// Shown when the service refuses a conversion without supplying a message.
pub const CONVERSION_FAILED_FALLBACK: &str = "Conversion failed";

/// Shown when a 2xx response carries no usable download reference.
pub const UNKNOWN_ERROR_FALLBACK: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The service refused the conversion. The message is the
    /// server-supplied `error` string when present, else a fixed fallback.
    #[error("{message}")]
    Rejected { message: String },

    /// The conversion request itself never produced a usable response.
    #[error("conversion request failed: {source}")]
    Transport { source: reqwest::Error },

    /// The convert call succeeded but fetching the artifact bytes did not.
    #[error("failed to fetch converted artifact: {source}")]
    ArtifactFetch { source: reqwest::Error },

    /// The server handed back a download reference that does not resolve
    /// against the configured server URL.
    #[error("could not resolve download url '{url}': {source}")]
    InvalidDownloadUrl {
        url: String,
        source: url::ParseError,
    },
}

impl ConvertError {
    /// Message for the error panel: server text verbatim when present.
    pub fn user_message(&self) -> String {
        match self {
            ConvertError::Rejected { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the failure happened after a successful convert response,
    /// while fetching the artifact bytes.
    pub fn is_artifact_fetch(&self) -> bool {
        matches!(self, ConvertError::ArtifactFetch { .. })
    }
}
