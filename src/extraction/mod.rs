//! Plain-text extraction for uploaded PDF and Word documents.
//!
//! Dispatch is driven by the declared content type first and the filename suffix second.
//! Format-specific work lives in [`pdf`] and [`docx`]; both operate on in-memory bytes.

pub mod docx;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod pdf;

use thiserror::Error;

const PDF_MIME: &str = "application/pdf";
const WORD_MIMES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// Errors raised while turning an upload into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The upload is neither PDF nor Word, or it produced no text.
    #[error("Unsupported file type")]
    UnsupportedFormat,
    /// The PDF parser rejected the document.
    #[error("Failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    /// The Word container could not be opened or lacks `word/document.xml`.
    #[error("Failed to open Word document: {0}")]
    DocxArchive(#[from] zip::result::ZipError),
    /// The Word body XML was malformed.
    #[error("Failed to parse Word document XML: {0}")]
    DocxXml(#[from] quick_xml::Error),
    /// Reading an archive entry failed.
    #[error("Failed to read document contents: {0}")]
    Io(#[from] std::io::Error),
}

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Portable Document Format.
    Pdf,
    /// Word-processing document (OOXML container).
    Docx,
    /// Anything else.
    Unsupported,
}

impl DocumentKind {
    /// Classify an upload from its declared content type and filename.
    pub fn detect(content_type: Option<&str>, filename: Option<&str>) -> Self {
        let mime = content_type.map(canonicalize_mime).unwrap_or_default();
        let has_suffix = |suffix: &str| {
            filename.is_some_and(|name| name.to_ascii_lowercase().ends_with(suffix))
        };

        if mime == PDF_MIME || has_suffix(".pdf") {
            Self::Pdf
        } else if WORD_MIMES.contains(&mime.as_str()) || has_suffix(".docx") {
            Self::Docx
        } else {
            Self::Unsupported
        }
    }
}

/// Drop MIME parameters and normalize case (`Application/PDF; x=y` -> `application/pdf`).
pub fn canonicalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Extract plain text from an upload.
///
/// Returns [`ExtractionError::UnsupportedFormat`] for unknown formats and for documents that
/// yield an empty string. Parser failures are returned as their own variants.
pub fn extract(
    bytes: &[u8],
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<String, ExtractionError> {
    let kind = DocumentKind::detect(content_type, filename);
    tracing::debug!(?kind, ?content_type, ?filename, size = bytes.len(), "Extracting text");
    let text = match kind {
        DocumentKind::Pdf => pdf::extract_text(bytes)?,
        DocumentKind::Docx => docx::extract_text(bytes)?,
        DocumentKind::Unsupported => return Err(ExtractionError::UnsupportedFormat),
    };
    if text.is_empty() {
        return Err(ExtractionError::UnsupportedFormat);
    }
    Ok(text)
}
