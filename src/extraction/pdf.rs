//! PDF text extraction backed by `lopdf`.

use lopdf::Document;

use super::ExtractionError;

/// Extract the text of every page, in page order.
///
/// Each page's trailing whitespace is trimmed; pages without text are skipped. The remaining
/// pages are joined with `\n`.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    // `get_pages` is keyed by page number, so iteration is already in page order.
    for page_number in pages.keys() {
        let text = document.extract_text(&[*page_number])?;
        let text = text.trim_end();
        if text.is_empty() {
            tracing::trace!(page = page_number, "Skipping page without text");
            continue;
        }
        texts.push(text.to_string());
    }

    tracing::debug!(
        pages = pages.len(),
        pages_with_text = texts.len(),
        "Extracted PDF text"
    );
    Ok(texts.join("\n"))
}
