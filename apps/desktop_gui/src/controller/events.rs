//! UI/backend events and error modeling for the desktop GUI controller.

use client_core::{ConvertedArtifact, RenderedMarkup};

pub enum UiEvent {
    Info(String),
    ConversionComplete {
        artifact: ConvertedArtifact,
    },
    PreviewRendered {
        markup: RenderedMarkup,
    },
    /// Rendering the preview failed; the conversion result itself stands.
    PreviewFailed {
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Conversion,
    Render,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Convert,
    FetchArtifact,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Conversion => "Conversion",
        UiErrorCategory::Render => "Rendering",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

/// Status-line text for a failed conversion. Transport-flavored failures
/// get an actionable hint; everything else is labelled and passed along.
/// The error panel itself always shows the raw message verbatim.
pub fn classify_conversion_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure")
        || lower.contains("failed to build backend runtime")
    {
        "Backend worker startup failure; restart the app and retry.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("error sending request")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Conversion service unreachable; check the server URL and retry.".to_string()
    } else {
        format!("Conversion error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unreachable")
            || message_lower.contains("error sending request")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("render") || message_lower.contains("preview") {
            UiErrorCategory::Render
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("unsupported")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("convert")
            || message_lower.contains("conversion")
            || message_lower.contains("artifact")
            || message_lower.contains("pdf")
        {
            UiErrorCategory::Conversion
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// True when the failure belongs on the error panel, i.e. it ended a
    /// conversion attempt rather than some ambient operation.
    pub fn ends_conversion(&self) -> bool {
        matches!(
            self.context,
            UiErrorContext::Convert | UiErrorContext::FetchArtifact
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
