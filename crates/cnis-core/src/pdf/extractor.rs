//! PDF text sources backed by pdf-extract and lopdf.

#[cfg(feature = "pdf")]
use std::borrow::Cow;

#[cfg(feature = "pdf")]
use lopdf::Document;
#[cfg(feature = "pdf")]
use tracing::{debug, trace};

use super::{Result, TextSource};
use crate::error::PdfError;

/// Whole-document text through `pdf_extract`.
pub struct PdfExtractSource;

/// Page-by-page text through `lopdf`.
pub struct LopdfSource;

/// Load a document, decrypting it when it uses an empty user password.
///
/// The flag tells whether the document was encrypted.
#[cfg(feature = "pdf")]
fn load_document(data: &[u8]) -> Result<(Document, bool)> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    let encrypted = doc.is_encrypted();
    if encrypted {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");
    }

    if doc.get_pages().is_empty() {
        return Err(PdfError::NoPages);
    }

    Ok((doc, encrypted))
}

/// Bytes pdf-extract can read: the input, or a decrypted copy of it.
#[cfg(feature = "pdf")]
fn readable_bytes(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    let (mut doc, encrypted) = load_document(data)?;
    if !encrypted {
        return Ok(Cow::Borrowed(data));
    }

    let mut decrypted = Vec::new();
    doc.save_to(&mut decrypted)
        .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
    Ok(Cow::Owned(decrypted))
}

impl TextSource for PdfExtractSource {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "pdf")
    }

    #[cfg(feature = "pdf")]
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let bytes = readable_bytes(data)?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    #[cfg(not(feature = "pdf"))]
    fn extract_text(&self, _data: &[u8]) -> Result<String> {
        Err(PdfError::NoSourceAvailable)
    }
}

impl TextSource for LopdfSource {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn is_available(&self) -> bool {
        cfg!(feature = "pdf")
    }

    /// Pages that fail to decode are skipped; each page ends with a newline.
    #[cfg(feature = "pdf")]
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let (doc, _) = load_document(data)?;
        let mut text = String::new();

        for page in doc.get_pages().keys() {
            match doc.extract_text(&[*page]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => trace!("Skipping page {}: {}", page, e),
            }
        }

        Ok(text)
    }

    #[cfg(not(feature = "pdf"))]
    fn extract_text(&self, _data: &[u8]) -> Result<String> {
        Err(PdfError::NoSourceAvailable)
    }
}
