use serde::{Deserialize, Serialize};

/// Body returned by `POST /upload`.
///
/// A successful conversion carries `download_url` (and usually `message`);
/// a refused one carries `error`. Every field is optional on the wire, so a
/// malformed or empty body still deserializes and the client decides what
/// the absence of `download_url` means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
