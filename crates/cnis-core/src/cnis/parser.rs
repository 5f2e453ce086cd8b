//! CNIS statement parser: personal data, then one record per section.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::error::ExtractionError;
use crate::models::config::CnisConfig;
use crate::models::record::{ClientData, ExtractionResult};

use super::employment::EmploymentExtractor;
use super::personal::PersonalDataExtractor;
use super::sections::SectionSplitter;
use super::Result;

/// Trait for CNIS parsing.
pub trait CnisParser {
    /// Parse a statement from its decoded text.
    fn parse(&self, text: &str) -> Result<ClientData>;
}

/// Rule-based CNIS parser.
pub struct HybridCnisParser {
    personal: PersonalDataExtractor,
    splitter: SectionSplitter,
    employment: EmploymentExtractor,
}

impl HybridCnisParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            personal: PersonalDataExtractor::new(),
            splitter: SectionSplitter::new(),
            employment: EmploymentExtractor::new(),
        }
    }

    /// Create a parser from the `extraction` section of a config.
    pub fn from_config(config: &CnisConfig) -> Self {
        let extraction = &config.extraction;
        Self::new()
            .with_cpf_validation(extraction.validate_cpf)
            .with_cnpj_validation(extraction.validate_cnpj)
            .with_max_continuation_lines(extraction.max_continuation_lines)
            .with_min_section_lines(extraction.min_section_lines)
    }

    /// Set CPF check digit validation.
    pub fn with_cpf_validation(mut self, validate: bool) -> Self {
        self.personal = self.personal.with_cpf_validation(validate);
        self
    }

    /// Set CNPJ check digit validation.
    pub fn with_cnpj_validation(mut self, validate: bool) -> Self {
        self.employment = self.employment.with_cnpj_validation(validate);
        self
    }

    /// Set how many lines may continue an employer name.
    pub fn with_max_continuation_lines(mut self, lines: usize) -> Self {
        self.employment = self.employment.with_max_continuation_lines(lines);
        self
    }

    /// Set the minimum number of non-blank lines of a section.
    pub fn with_min_section_lines(mut self, lines: usize) -> Self {
        self.splitter = self.splitter.with_min_lines(lines);
        self
    }

    /// Run a full extraction pass and report the outcome as data.
    ///
    /// Blank text short-circuits to a failure. Errors and panics inside
    /// the pass become failure results; nothing is propagated.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            warn!("No text to extract from");
            return ExtractionResult::failure(ExtractionError::EmptyText.to_string());
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.parse(text))) {
            Ok(Ok(data)) => ExtractionResult::success(data, text.chars().count()),
            Ok(Err(e)) => {
                error!("Extraction failed: {}", e);
                ExtractionResult::failure(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Extraction panicked: {}", message);
                ExtractionResult::failure(ExtractionError::Internal(message).to_string())
            }
        }
    }
}

impl Default for HybridCnisParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CnisParser for HybridCnisParser {
    fn parse(&self, text: &str) -> Result<ClientData> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyText);
        }

        let start = Instant::now();
        info!("Parsing CNIS statement from {} characters of text", text.chars().count());

        let personal = self.personal.extract(text);
        let birth_date = personal.known_birth_date();

        let records: Vec<_> = self
            .splitter
            .split(text)
            .iter()
            .filter_map(|section| self.employment.extract(section, birth_date))
            .collect();

        info!(
            "Extracted {} employment records for {:?} in {} ms",
            records.len(),
            personal.name,
            start.elapsed().as_millis()
        );

        Ok(ClientData::new(personal, records))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure while parsing".to_string()
    }
}
