use std::path::Path;

/// Media type the conversion service accepts.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Media type of the converted artifact.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Upload cap enforced by the conversion service.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Validation accepts exactly the PDF media type, nothing looser.
pub fn is_pdf_media_type(media_type: &str) -> bool {
    media_type == PDF_MEDIA_TYPE
}

/// Output filename for a converted document: source name with the extension
/// swapped to `.docx` (`report.pdf` -> `report.docx`).
pub fn docx_output_filename(source_name: &str) -> String {
    Path::new(source_name)
        .with_extension("docx")
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod domain_tests;
