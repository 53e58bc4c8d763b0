use super::ExtractionError;

/// Extract all text from a PDF held in memory.
///
/// `pdf-extract` returns the whole document as one string; page structure
/// is irrelevant downstream because the chunker scans raw text. A PDF with
/// no text layer (scanned/image PDF) extracts successfully but yields an
/// empty string — the caller decides how to report that.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;
    Ok(text)
}
