use bytes::Bytes;
use tracing::debug;

use crate::parsing::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// Picks the extractor from the file extension, falling back to the declared MIME type.
pub fn detect_kind(filename: &str, content_type: Option<&str>) -> Result<DocumentKind, ParseError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => return Ok(DocumentKind::Pdf),
        Some("txt") => return Ok(DocumentKind::PlainText),
        Some(_) => return Err(ParseError::UnsupportedType(filename.to_string())),
        None => {}
    }

    match content_type.map(|c| c.split(';').next().unwrap_or(c).trim()) {
        Some("application/pdf") => Ok(DocumentKind::Pdf),
        Some("text/plain") => Ok(DocumentKind::PlainText),
        _ => Err(ParseError::UnsupportedType(filename.to_string())),
    }
}

/// Extracts raw text. PDF parsing is CPU-bound and runs on the blocking pool.
pub async fn extract_text(kind: DocumentKind, data: Bytes) -> Result<String, ParseError> {
    let raw = match kind {
        DocumentKind::Pdf => {
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                .await
                .map_err(|e| {
                    if e.is_panic() {
                        ParseError::Pdf("extractor panicked on malformed input".to_string())
                    } else {
                        ParseError::Join(e)
                    }
                })?
                .map_err(|e| ParseError::Pdf(e.to_string()))?
        }
        DocumentKind::PlainText => String::from_utf8_lossy(&data).into_owned(),
    };
    debug!(?kind, chars = raw.len(), "text extracted");
    Ok(raw)
}

/// Normalises whitespace inside lines and squeezes runs of blank lines.
/// Line breaks are kept: section detection and bullet checks depend on them.
pub fn clean_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut out: Vec<String> = Vec::new();
    let mut blank_run = 0;

    for line in normalized.lines() {
        let collapsed = line
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if collapsed.is_empty() {
            blank_run += 1;
            if blank_run == 1 && !out.is_empty() {
                out.push(String::new());
            }
        } else {
            blank_run = 0;
            out.push(collapsed);
        }
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}
