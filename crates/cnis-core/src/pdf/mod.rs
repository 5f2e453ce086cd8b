//! Text acquisition from CNIS documents.

mod acquirer;
mod extractor;

pub use acquirer::TextAcquirer;
pub use extractor::{LopdfSource, PdfExtractSource};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A way of turning document bytes into text.
pub trait TextSource: Send + Sync {
    /// Name used in configuration and logs.
    fn name(&self) -> &'static str;

    /// Whether this source was compiled in and can be used.
    fn is_available(&self) -> bool;

    /// Extract the document text.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Build a source from its configuration name.
pub fn source_by_name(name: &str) -> Option<Box<dyn TextSource>> {
    match name {
        "pdf-extract" => Some(Box::new(PdfExtractSource)),
        "lopdf" => Some(Box::new(LopdfSource)),
        _ => None,
    }
}
