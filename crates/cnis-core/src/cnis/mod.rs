//! CNIS statement extraction module.

pub mod employment;
mod parser;
pub mod personal;
pub mod rules;
pub mod sections;

pub use employment::EmploymentExtractor;
pub use parser::{CnisParser, HybridCnisParser};
pub use personal::PersonalDataExtractor;
pub use sections::{split_sections, Section, SectionSplitter};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
