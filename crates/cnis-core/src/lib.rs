//! Core library for Brazilian CNIS statement processing.
//!
//! This crate provides:
//! - Text acquisition from PDF (pdf-extract, lopdf) and plain text
//! - Personal data extraction (name, CPF, birth date)
//! - Splitting of the statement into per-employer sections
//! - Employment record extraction with competence month normalization
//! - CPF and CNPJ check digit validation

pub mod cnis;
pub mod error;
pub mod models;
pub mod pdf;

pub use cnis::{CnisParser, HybridCnisParser};
pub use error::{CnisError, ExtractionError, PdfError, Result};
pub use models::config::CnisConfig;
pub use models::record::{ClientData, EmploymentRecord, ExtractionResult, PersonalData};
pub use pdf::{TextAcquirer, TextSource};
