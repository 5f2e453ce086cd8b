//! CNPJ (Brazilian employer number) extraction and validation.
//!
//! In CNIS text the CNPJ may be complete (`dd.ddd.ddd/dddd-dd`), split
//! across a line break at the slash, or reduced to its root
//! (`dd.ddd.ddd`) when the statement only carries the company root.

use super::patterns::{CNPJ_FULL, CNPJ_PARTIAL, CNPJ_WRAPPED};
use super::{ExtractionMatch, FieldExtractor};

/// CNPJ field extractor.
pub struct CnpjExtractor {
    validate: bool,
}

impl CnpjExtractor {
    /// Create a new CNPJ extractor. Check digits are not verified by default.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to validate check digits of complete CNPJs.
    ///
    /// A complete CNPJ with wrong digits falls back to its root.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    fn accepts(&self, cnpj: &str) -> bool {
        !self.validate || validate_cnpj(cnpj)
    }
}

impl Default for CnpjExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CnpjExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        // Complete CNPJ first
        if let Some(m) = CNPJ_FULL
            .find_iter(text)
            .find(|m| self.accepts(m.as_str()))
        {
            return Some(
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        // Complete CNPJ broken at the slash
        for caps in CNPJ_WRAPPED.captures_iter(text) {
            let Some(full_match) = caps.get(0) else { continue };
            let cnpj = format!("{}/{}", &caps[1], &caps[2]);
            if self.accepts(&cnpj) {
                return Some(
                    ExtractionMatch::new(cnpj, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // Root only
        CNPJ_PARTIAL.find(text).map(|m| {
            ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                .with_position(m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in CNPJ_FULL.find_iter(text) {
            if self.accepts(m.as_str()) && !results.iter().any(|r| r.value == m.as_str()) {
                results.push(
                    ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        // Roots not already covered by a complete CNPJ
        for m in CNPJ_PARTIAL.find_iter(text) {
            if !results.iter().any(|r| r.value.starts_with(m.as_str())) {
                results.push(
                    ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Extract the best CNPJ from text.
pub fn extract_cnpj(text: &str) -> Option<String> {
    CnpjExtractor::new().extract(text).map(|m| m.value)
}

/// Root (`dd.ddd.ddd`) of a formatted CNPJ.
pub fn cnpj_root(cnpj: &str) -> &str {
    CNPJ_PARTIAL
        .find(cnpj)
        .map(|m| m.as_str())
        .unwrap_or(cnpj)
}

/// Validate a complete CNPJ using its two mod-11 check digits.
///
/// Punctuation is ignored. Roots and numbers made of one repeated digit
/// are invalid.
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 14 {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    const WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let check_digit = |len: usize| -> u32 {
        let weights = &WEIGHTS[WEIGHTS.len() - len..];
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            0 | 1 => 0,
            r => 11 - r,
        }
    };

    check_digit(12) == digits[12] && check_digit(13) == digits[13]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cnpj() {
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(validate_cnpj("11222333000181"));
        assert!(!validate_cnpj("11.222.333/0001-82"));
        assert!(!validate_cnpj("12.345.678/0001-99"));
        assert!(!validate_cnpj("11.222.333"));
        assert!(!validate_cnpj("00.000.000/0000-00"));
    }

    #[test]
    fn test_extract_full_before_partial() {
        let text = "1 12.345.678 EMPRESA 98.765.432/0001-10";
        assert_eq!(extract_cnpj(text), Some("98.765.432/0001-10".to_string()));
    }

    #[test]
    fn test_extract_wrapped() {
        let text = "1 12.345.678/ 0001-99 EMPRESA EXEMPLO LTDA";
        assert_eq!(extract_cnpj(text), Some("12.345.678/0001-99".to_string()));
    }

    #[test]
    fn test_extract_partial() {
        assert_eq!(
            extract_cnpj("3 12.345.678 EMPRESA"),
            Some("12.345.678".to_string())
        );
        assert_eq!(extract_cnpj("CPF: 111.222.333-44"), None);
    }

    #[test]
    fn test_validation_falls_back_to_root() {
        let extractor = CnpjExtractor::new().with_validation(true);
        let found = extractor.extract("1 12.345.678/0001-99 EMPRESA").unwrap();
        assert_eq!(found.value, "12.345.678");

        let found = extractor.extract("1 11.222.333/0001-81 EMPRESA").unwrap();
        assert_eq!(found.value, "11.222.333/0001-81");
    }

    #[test]
    fn test_extract_all_skips_covered_roots() {
        let text = "11.222.333/0001-81 e 11.222.333 e 44.555.666";
        let values: Vec<String> = CnpjExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec!["11.222.333/0001-81", "44.555.666"]);
    }

    #[test]
    fn test_cnpj_root() {
        assert_eq!(cnpj_root("12.345.678/0001-99"), "12.345.678");
        assert_eq!(cnpj_root("12.345.678"), "12.345.678");
    }
}
