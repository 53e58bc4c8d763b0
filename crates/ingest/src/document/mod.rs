pub mod chunker;
mod pdf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
}

pub use pdf::extract_pdf;

/// Extract plain text from uploaded file bytes. Only PDFs are accepted;
/// the extension check mirrors the upload endpoint's content-type check.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractionError> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "pdf" => extract_pdf(bytes),
        other => Err(ExtractionError::UnsupportedType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_extension() {
        let err = extract_text(b"hello", "notes.txt").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t == "txt"));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = extract_text(b"hello", "README").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(_)));
    }

    #[test]
    fn garbage_bytes_fail_extraction() {
        let err = extract_text(b"not a pdf at all", "file.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }
}
