//! Word (OOXML) text extraction.
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`. Only paragraphs
//! that are direct children of `w:body` are collected, so table cells, headers and text boxes
//! do not contribute. A paragraph's text is the concatenation of its runs (including runs
//! nested in hyperlinks), with tabs and line breaks rendered as `\t` and `\n`.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract body paragraphs joined with `\n`. Empty paragraphs are kept as empty lines.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let paragraphs = body_paragraphs(&xml)?;
    tracing::debug!(paragraphs = paragraphs.len(), "Extracted Word text");
    Ok(paragraphs.join("\n"))
}

/// Walk `document.xml` and return the text of each body-level paragraph.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    // Local names of the currently open elements.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = local_name(&element);
                if name == b"p" && parent_is(&stack, b"body") {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(element) => {
                let name = local_name(&element);
                if name == b"p" && parent_is(&stack, b"body") {
                    paragraphs.push(String::new());
                } else if let Some(text) = current.as_mut() {
                    if in_paragraph_run(&stack) {
                        match name.as_slice() {
                            b"tab" => text.push('\t'),
                            b"br" | b"cr" => text.push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            Event::Text(content) => {
                if let Some(text) = current.as_mut() {
                    if in_run_text(&stack) {
                        text.push_str(&content.unescape()?);
                    }
                }
            }
            Event::CData(content) => {
                if let Some(text) = current.as_mut() {
                    if in_run_text(&stack) {
                        text.push_str(&String::from_utf8_lossy(&content));
                    }
                }
            }
            Event::End(_) => {
                let closed = stack.pop();
                if closed.as_deref() == Some(b"p".as_slice()) && parent_is(&stack, b"body") {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn local_name(element: &BytesStart<'_>) -> Vec<u8> {
    element.local_name().as_ref().to_vec()
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().is_some_and(|parent| parent == name)
}

/// Index of the body-level paragraph on the stack, if any.
fn paragraph_depth(stack: &[Vec<u8>]) -> Option<usize> {
    stack
        .windows(2)
        .position(|pair| pair[0] == b"body" && pair[1] == b"p")
        .map(|index| index + 1)
}

/// True when the innermost open element is a run directly owned by the body paragraph
/// (optionally through a hyperlink).
fn in_paragraph_run(stack: &[Vec<u8>]) -> bool {
    let Some(depth) = paragraph_depth(stack) else {
        return false;
    };
    match &stack[depth + 1..] {
        [run] => run == b"r",
        [link, run] => link == b"hyperlink" && run == b"r",
        _ => false,
    }
}

/// True when the innermost open element is a `w:t` inside a paragraph run.
fn in_run_text(stack: &[Vec<u8>]) -> bool {
    match stack.split_last() {
        Some((last, rest)) => last == b"t" && in_paragraph_run(rest),
        None => false,
    }
}
