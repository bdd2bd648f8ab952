//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    /// Read the selected document and run the conversion round trip.
    Convert {
        path: PathBuf,
        filename: String,
        media_type: Option<String>,
    },
    /// Run the converted artifact's bytes through the document renderer.
    RenderPreview { bytes: Vec<u8> },
}
