//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the cnis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CnisConfig {
    /// Text acquisition configuration.
    pub pdf: PdfConfig,

    /// Record extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Text acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Text sources to try, in order. Known names: "pdf-extract", "lopdf".
    pub sources: Vec<String>,

    /// Minimum characters of text a source must yield to be accepted.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            sources: vec!["pdf-extract".to_string(), "lopdf".to_string()],
            min_text_length: 1,
        }
    }
}

/// Record extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject CPF candidates with wrong check digits.
    pub validate_cpf: bool,

    /// Reject complete CNPJs with wrong check digits, keeping their root.
    pub validate_cnpj: bool,

    /// Lines after an employer line that may continue the employer name.
    pub max_continuation_lines: usize,

    /// Sections with fewer non-blank lines are discarded as noise.
    pub min_section_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_cpf: false,
            validate_cnpj: false,
            max_continuation_lines: 3,
            min_section_lines: 2,
        }
    }
}

impl CnisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: CnisConfig =
            serde_json::from_str(r#"{ "extraction": { "validate_cpf": true } }"#).unwrap();

        assert!(config.extraction.validate_cpf);
        assert_eq!(config.extraction.max_continuation_lines, 3);
        assert_eq!(config.pdf.sources, vec!["pdf-extract", "lopdf"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CnisConfig::default();
        config.extraction.min_section_lines = 3;
        config.save(&path).unwrap();

        let loaded = CnisConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.min_section_lines, 3);
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = CnisConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
