//! Error types for the cnis-core library.

use thiserror::Error;

/// Main error type for the cnis library.
#[derive(Error, Debug)]
pub enum CnisError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text acquisition.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// None of the configured text sources is compiled in or usable.
    #[error("no text source available")]
    NoSourceAvailable,
}

/// Errors raised by the extraction pass itself.
///
/// Missing fields are never errors; they surface as empty strings.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document text is empty or whitespace only.
    #[error("Não foi possível extrair texto do PDF")]
    EmptyText,

    /// Unexpected failure inside the pass.
    #[error("{0}")]
    Internal(String),
}

/// Result type for the cnis library.
pub type Result<T> = std::result::Result<T, CnisError>;
