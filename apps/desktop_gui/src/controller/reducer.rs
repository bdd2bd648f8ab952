//! Reducer-like state for the upload flow: panel visibility, the selected
//! file, the converted artifact, and preview toggling.
//!
//! Exactly one of the five panels is visible at a time, and all
//! transitions run through this type; the GUI layer and the backend worker
//! are only event sources. The converted artifact is held if and only if
//! the flow is in `Success`.

use std::path::PathBuf;

use client_core::{ConvertedArtifact, RenderedMarkup};
use shared::domain::{is_pdf_media_type, MAX_UPLOAD_BYTES};

pub const INVALID_FILE_NOTICE: &str = "Please upload a valid PDF file.";
pub const OVERSIZED_FILE_NOTICE: &str = "File exceeds the 100 MB upload limit.";
pub const PREVIEW_FAILED_NOTICE: &str = "Could not generate preview.";
pub const GENERIC_CONVERSION_ERROR: &str = "An error occurred during conversion.";

pub const PREVIEW_LABEL: &str = "Preview";
pub const CLOSE_PREVIEW_LABEL: &str = "Close Preview";

/// The five mutually exclusive panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    FileChosen,
    Processing,
    Success,
    Error,
}

/// A file offered by drag-drop or the file picker, before validation.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    pub name: String,
    pub path: PathBuf,
    pub media_type: Option<String>,
    pub size_bytes: Option<u64>,
}

/// The accepted document, held until reset or replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub media_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    /// Declared media type is not `application/pdf`.
    RejectedMediaType,
    /// Larger than the service's upload cap.
    RejectedOversized,
    /// Offered in a state whose panel has no drop affordance.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewToggle {
    /// No preview shown yet: the artifact bytes need a render pass.
    RenderRequested,
    /// An open preview has been cleared; no render happens.
    Closed,
    /// Toggling is meaningless right now (wrong state, or a render is
    /// already in flight).
    Unavailable,
}

pub struct UploadFlowController {
    state: UiState,
    selected: Option<SelectedFile>,
    artifact: Option<ConvertedArtifact>,
    preview: Option<RenderedMarkup>,
    preview_pending: bool,
    error_message: Option<String>,
    notice: Option<String>,
}

impl UploadFlowController {
    pub fn new() -> Self {
        Self {
            state: UiState::Idle,
            selected: None,
            artifact: None,
            preview: None,
            preview_pending: false,
            error_message: None,
            notice: None,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn artifact(&self) -> Option<&ConvertedArtifact> {
        self.artifact.as_ref()
    }

    pub fn preview(&self) -> Option<&RenderedMarkup> {
        self.preview.as_ref()
    }

    pub fn preview_pending(&self) -> bool {
        self.preview_pending
    }

    /// Message for the error panel; empty server messages fall back to a
    /// generic line.
    pub fn error_message(&self) -> &str {
        self.error_message
            .as_deref()
            .unwrap_or(GENERIC_CONVERSION_ERROR)
    }

    /// Dismissible warning (invalid file, failed preview); `None` when
    /// nothing is pending.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn preview_toggle_label(&self) -> &'static str {
        if self.preview.is_some() {
            CLOSE_PREVIEW_LABEL
        } else {
            PREVIEW_LABEL
        }
    }

    /// Validates and stores a candidate file. Only the panels that show a
    /// drop affordance (`Idle`, `FileChosen`) take files; a rejection
    /// leaves any previously chosen file untouched.
    pub fn accept_file(&mut self, candidate: FileCandidate) -> AcceptOutcome {
        if !matches!(self.state, UiState::Idle | UiState::FileChosen) {
            return AcceptOutcome::Ignored;
        }

        let media_type = match candidate.media_type {
            Some(media_type) if is_pdf_media_type(&media_type) => media_type,
            _ => {
                self.notice = Some(INVALID_FILE_NOTICE.to_string());
                return AcceptOutcome::RejectedMediaType;
            }
        };

        if candidate.size_bytes.is_some_and(|size| size > MAX_UPLOAD_BYTES) {
            self.notice = Some(OVERSIZED_FILE_NOTICE.to_string());
            return AcceptOutcome::RejectedOversized;
        }

        self.selected = Some(SelectedFile {
            name: candidate.name,
            path: candidate.path,
            media_type,
        });
        self.state = UiState::FileChosen;
        self.artifact = None;
        self.preview = None;
        self.preview_pending = false;
        self.error_message = None;
        self.notice = None;
        AcceptOutcome::Accepted
    }

    /// Clears the selected file and everything derived from it, restoring
    /// the initial panel. Valid from any state.
    pub fn remove_file(&mut self) {
        self.selected = None;
        self.artifact = None;
        self.preview = None;
        self.preview_pending = false;
        self.error_message = None;
        self.notice = None;
        self.state = UiState::Idle;
    }

    /// Enters `Processing` if a file is chosen; returns whether the caller
    /// should dispatch the conversion. Converting with no file selected is
    /// a no-op.
    pub fn begin_conversion(&mut self) -> bool {
        if self.state != UiState::FileChosen || self.selected.is_none() {
            return false;
        }
        self.state = UiState::Processing;
        self.notice = None;
        true
    }

    /// Completion for a conversion started with [`begin_conversion`].
    /// Completions that arrive outside `Processing` (e.g. after a reset
    /// raced the response) are dropped.
    ///
    /// [`begin_conversion`]: Self::begin_conversion
    pub fn conversion_succeeded(&mut self, artifact: ConvertedArtifact) {
        if self.state != UiState::Processing {
            return;
        }
        self.artifact = Some(artifact);
        self.state = UiState::Success;
    }

    /// Failure counterpart of [`conversion_succeeded`]; the message is
    /// shown verbatim on the error panel, with a generic fallback for an
    /// empty one.
    ///
    /// [`conversion_succeeded`]: Self::conversion_succeeded
    pub fn conversion_failed(&mut self, message: impl Into<String>) {
        if self.state != UiState::Processing {
            return;
        }
        let message = message.into();
        self.error_message = if message.trim().is_empty() {
            None
        } else {
            Some(message)
        };
        self.artifact = None;
        self.state = UiState::Error;
    }

    /// Opens or closes the preview. Opening asks the caller to run a
    /// render pass over the artifact bytes; closing just clears the
    /// region, and re-opening later renders again.
    pub fn toggle_preview(&mut self) -> PreviewToggle {
        if self.state != UiState::Success {
            return PreviewToggle::Unavailable;
        }
        if self.preview.is_some() {
            self.preview = None;
            return PreviewToggle::Closed;
        }
        if self.preview_pending {
            return PreviewToggle::Unavailable;
        }
        self.preview_pending = true;
        PreviewToggle::RenderRequested
    }

    /// Render completion for a [`toggle_preview`] request; stale results
    /// (after reset or close) are dropped.
    ///
    /// [`toggle_preview`]: Self::toggle_preview
    pub fn preview_rendered(&mut self, markup: RenderedMarkup) {
        if self.state != UiState::Success || !self.preview_pending {
            return;
        }
        self.preview = Some(markup);
        self.preview_pending = false;
    }

    /// Non-fatal: the flow stays in `Success` with no preview shown and a
    /// dismissible notice raised.
    pub fn preview_failed(&mut self) {
        self.preview_pending = false;
        if self.state == UiState::Success {
            self.notice = Some(PREVIEW_FAILED_NOTICE.to_string());
        }
    }

    /// Back to the initial panel; used by both "Convert Another" and
    /// "Try Again".
    pub fn reset(&mut self) {
        self.remove_file();
    }
}

impl Default for UploadFlowController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod reducer_tests;
