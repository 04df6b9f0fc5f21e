use std::panic;
use std::path::Path;

use crate::error::{Error, Result};

/// Turns a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Extractor for resumes: PDFs through `pdf-extract`, plain text files read
/// as UTF-8. Any other extension is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    fn detect_kind(path: &Path) -> Result<DocumentKind> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "text" | "md" => Ok(DocumentKind::PlainText),
            "" => Err(Error::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(Error::UnsupportedFormat(format!(".{} ({})", other, path.display()))),
        }
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let kind = Self::detect_kind(path)?;
        let bytes = std::fs::read(path)?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

        match kind {
            DocumentKind::Pdf => extract_pdf_text(&bytes),
            DocumentKind::PlainText => String::from_utf8(bytes)
                .map_err(|e| Error::Extraction(format!("{} is not valid UTF-8: {}", path.display(), e))),
        }
    }
}

/// Decodes every page of a PDF held in memory. A failure on any page fails
/// the whole document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let decoded = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match decoded {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(Error::Extraction(e.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
                .unwrap_or_else(|| "PDF decoder panicked".to_string());
            Err(Error::Extraction(reason))
        }
    }
}
