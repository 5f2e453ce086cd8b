//! Rule-based field extractors for CNIS statements.

pub mod cnpj;
pub mod cpf;
pub mod dates;
pub mod patterns;
pub mod text;

pub use cnpj::{cnpj_root, extract_cnpj, validate_cnpj, CnpjExtractor};
pub use cpf::{extract_cpf, validate_cpf, CpfExtractor};
pub use dates::{
    last_day_of_month, normalize_month_year, resolve_month_year, scan_dates, DateCandidate,
    DateKind,
};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A pure matcher in a first-match-wins chain.
pub type Matcher<T> = fn(&str) -> Option<T>;

/// Run `matchers` in order over `text` and return the first hit.
pub fn first_match<T>(matchers: &[Matcher<T>], text: &str) -> Option<T> {
    matchers.iter().find_map(|matcher| matcher(text))
}

/// A matched value with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
