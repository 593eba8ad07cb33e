//! Resume text extraction for PDF, DOCX and plain-text uploads.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use bytes::Bytes;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Error reading PDF: {0}")]
    Pdf(String),

    #[error("Error reading DOCX: {0}")]
    Docx(String),

    #[error("Error reading TXT: {0}")]
    Text(#[from] std::string::FromUtf8Error),

    #[error("No text could be extracted from the file")]
    Empty,

    #[error("Parser crashed while reading {0}")]
    Crashed(String),
}

static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:tab\s*/>").expect("valid regex"));
static XML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static CHAR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9A-Fa-f]+)|([0-9]+));").expect("valid regex"));

/// Extracts text from an uploaded resume, choosing the parser by extension.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ParseError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => extract_pdf(bytes)?,
        "docx" => extract_docx(bytes)?,
        "txt" => String::from_utf8(bytes.to_vec())?,
        other => return Err(ParseError::UnsupportedFormat(other.to_string())),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(text)
}

/// Runs [`extract_text`] on the blocking pool. PDF parsing is CPU-bound and
/// can panic on malformed input; a panic becomes `ParseError::Crashed`.
pub async fn extract_text_blocking(file_name: String, bytes: Bytes) -> Result<String, ParseError> {
    let name = file_name.clone();
    tokio::task::spawn_blocking(move || extract_text(&file_name, &bytes))
        .await
        .map_err(|_| ParseError::Crashed(name))?
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))
}

/// Reads `word/document.xml` from the DOCX archive and keeps one line per
/// paragraph.
fn extract_docx(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ParseError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ParseError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ParseError::Docx(e.to_string()))?;

    Ok(docx_xml_to_text(&xml))
}

fn docx_xml_to_text(xml: &str) -> String {
    let with_breaks = PARAGRAPH_END.replace_all(xml, "\n");
    let stripped = XML_TAG.replace_all(&with_breaks, "");
    unescape_xml(&stripped)
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes numeric character references and the five predefined entities.
/// `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn unescape_xml(text: &str) -> String {
    let decoded = CHAR_REF.replace_all(text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        match code.and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });
    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
