//! CPF (Brazilian individual taxpayer number) extraction and validation.

use super::patterns::{CPF_LABELED, CPF_STANDALONE, CPF_WITH_NIT};
use super::{first_match, ExtractionMatch, FieldExtractor, Matcher};
use regex::Regex;

/// CPF matchers in priority order: next to a NIT label, labeled alone, bare.
const CPF_MATCHERS: &[Matcher<ExtractionMatch<String>>] =
    &[cpf_with_nit, cpf_labeled, cpf_standalone];

fn capture_cpf(pattern: &Regex, text: &str) -> Option<ExtractionMatch<String>> {
    let caps = pattern.captures(text)?;
    let cpf = caps.get(1)?;
    let full_match = caps.get(0)?;
    Some(
        ExtractionMatch::new(cpf.as_str().to_string(), full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

fn cpf_with_nit(text: &str) -> Option<ExtractionMatch<String>> {
    capture_cpf(&CPF_WITH_NIT, text)
}

fn cpf_labeled(text: &str) -> Option<ExtractionMatch<String>> {
    capture_cpf(&CPF_LABELED, text)
}

fn cpf_standalone(text: &str) -> Option<ExtractionMatch<String>> {
    capture_cpf(&CPF_STANDALONE, text)
}

/// CPF field extractor.
pub struct CpfExtractor {
    validate: bool,
}

impl CpfExtractor {
    /// Create a new CPF extractor. Check digits are not verified by default.
    pub fn new() -> Self {
        Self { validate: false }
    }

    /// Set whether to validate CPF check digits.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for CpfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CpfExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if self.validate {
            self.extract_all(text).into_iter().next()
        } else {
            first_match(CPF_MATCHERS, text)
        }
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for pattern in [&*CPF_WITH_NIT, &*CPF_LABELED, &*CPF_STANDALONE] {
            for caps in pattern.captures_iter(text) {
                let (Some(full_match), Some(cpf)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let cpf = cpf.as_str().to_string();

                if results.iter().any(|r| r.value == cpf) {
                    continue;
                }

                if !self.validate || validate_cpf(&cpf) {
                    results.push(
                        ExtractionMatch::new(cpf, full_match.as_str())
                            .with_position(full_match.start(), full_match.end()),
                    );
                }
            }
        }

        results
    }
}

/// Extract CPF from text.
pub fn extract_cpf(text: &str) -> Option<String> {
    CpfExtractor::new().extract(text).map(|m| m.value)
}

/// Validate a CPF using its two mod-11 check digits.
///
/// Punctuation is ignored. Numbers made of one repeated digit are invalid.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check_digit = |len: usize| -> u32 {
        let sum: u32 = digits
            .iter()
            .take(len)
            .zip((2..=(len as u32 + 1)).rev())
            .map(|(d, w)| d * w)
            .sum();
        (sum * 10 % 11) % 10
    };

    check_digit(9) == digits[9] && check_digit(10) == digits[10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cpf_valid() {
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("52998224725"));
    }

    #[test]
    fn test_validate_cpf_invalid() {
        assert!(!validate_cpf("529.982.247-26")); // Wrong check digit
        assert!(!validate_cpf("111.222.333-44"));
        assert!(!validate_cpf("111.111.111-11")); // Repeated digit
        assert!(!validate_cpf("529.982.247")); // Too short
    }

    #[test]
    fn test_extract_prefers_nit_label() {
        let text = "CPF do procurador 999.888.777-66\nNIT: 123.456.789-0 CPF: 111.222.333-44";
        assert_eq!(extract_cpf(text), Some("111.222.333-44".to_string()));
    }

    #[test]
    fn test_extract_labeled_before_bare() {
        let text = "Ref 999.888.777-66\nCPF: 111.222.333-44";
        assert_eq!(extract_cpf(text), Some("111.222.333-44".to_string()));

        let found = CpfExtractor::new().extract(text).unwrap();
        assert_eq!(found.source, "CPF: 111.222.333-44");
    }

    #[test]
    fn test_extract_bare() {
        let text = "Filiado 111.222.333-44 JOAO";
        let found = CpfExtractor::new().extract(text).unwrap();
        assert_eq!(found.value, "111.222.333-44");
        assert_eq!(found.position, Some((8, 22)));
    }

    #[test]
    fn test_validation_skips_bad_check_digits() {
        let text = "CPF: 111.222.333-44\nOutro: 529.982.247-25";
        let extractor = CpfExtractor::new().with_validation(true);
        assert_eq!(extractor.extract(text).unwrap().value, "529.982.247-25");
        assert_eq!(extractor.extract_all(text).len(), 1);
    }
}
