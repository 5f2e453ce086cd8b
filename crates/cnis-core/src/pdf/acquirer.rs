//! Ordered fallback over text sources.

use std::path::Path;

use tracing::{debug, error, info, warn};

use super::{source_by_name, LopdfSource, PdfExtractSource, TextSource};
use crate::error::{CnisError, PdfError};
use crate::models::config::PdfConfig;

/// Tries each text source in order until one yields usable text.
pub struct TextAcquirer {
    sources: Vec<Box<dyn TextSource>>,
    min_text_length: usize,
}

impl TextAcquirer {
    /// pdf-extract first, then lopdf.
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(PdfExtractSource), Box::new(LopdfSource)],
            min_text_length: 1,
        }
    }

    /// Use exactly the given sources, in order.
    pub fn with_sources(sources: Vec<Box<dyn TextSource>>) -> Self {
        Self {
            sources,
            min_text_length: 1,
        }
    }

    /// Build from the `pdf` config section. Unknown source names are an error.
    pub fn from_config(config: &PdfConfig) -> crate::Result<Self> {
        let sources = config
            .sources
            .iter()
            .map(|name| {
                source_by_name(name)
                    .ok_or_else(|| CnisError::Config(format!("unknown text source: {}", name)))
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self::with_sources(sources).with_min_text_length(config.min_text_length))
    }

    /// Text with fewer non-whitespace characters is treated as no text.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length.max(1);
        self
    }

    /// Names of the configured sources, in order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Extract text from document bytes.
    ///
    /// Returns an empty string when every available source fails, and
    /// [`PdfError::NoSourceAvailable`] when none is available at all.
    pub fn acquire(&self, data: &[u8]) -> super::Result<String> {
        let mut tried = 0;

        for source in &self.sources {
            if !source.is_available() {
                debug!("Text source {} is not available, skipping", source.name());
                continue;
            }
            tried += 1;

            match source.extract_text(data) {
                Ok(text) if self.is_usable(&text) => {
                    info!(
                        "Extracted {} characters with {}",
                        text.chars().count(),
                        source.name()
                    );
                    return Ok(text);
                }
                Ok(_) => warn!("Text source {} returned no usable text", source.name()),
                Err(e) => warn!("Text source {} failed: {}", source.name(), e),
            }
        }

        if tried == 0 {
            return Err(PdfError::NoSourceAvailable);
        }

        error!("Could not extract text from the document");
        Ok(String::new())
    }

    /// Read a document from disk. `.txt` files are taken as already
    /// decoded text; anything else goes through the sources.
    pub fn read_path(&self, path: &Path) -> crate::Result<String> {
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));

        if is_text {
            debug!("Reading plain text from {}", path.display());
            return Ok(std::fs::read_to_string(path)?);
        }

        let data = std::fs::read(path)?;
        Ok(self.acquire(&data)?)
    }

    fn is_usable(&self, text: &str) -> bool {
        text.chars().filter(|c| !c.is_whitespace()).count() >= self.min_text_length
    }
}

impl Default for TextAcquirer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedSource {
        name: &'static str,
        available: bool,
        output: std::result::Result<&'static str, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        fn boxed(
            name: &'static str,
            available: bool,
            output: std::result::Result<&'static str, &'static str>,
        ) -> (Box<dyn TextSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = FixedSource {
                name,
                available,
                output,
                calls: Arc::clone(&calls),
            };
            (Box::new(source), calls)
        }
    }

    impl TextSource for FixedSource {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn extract_text(&self, _data: &[u8]) -> crate::pdf::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.output
                .map(str::to_string)
                .map_err(|e| PdfError::TextExtraction(e.to_string()))
        }
    }

    #[test]
    fn test_falls_through_errors_and_blank_text() {
        let (failing, _) = FixedSource::boxed("failing", true, Err("broken"));
        let (blank, _) = FixedSource::boxed("blank", true, Ok("  \n "));
        let (good, _) = FixedSource::boxed("good", true, Ok("EXTRATO"));
        let (unused, unused_calls) = FixedSource::boxed("unused", true, Ok("other"));

        let acquirer = TextAcquirer::with_sources(vec![failing, blank, good, unused]);
        assert_eq!(acquirer.acquire(b"%PDF").unwrap(), "EXTRATO");
        assert_eq!(unused_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unavailable_source_is_not_called() {
        let (offline, offline_calls) = FixedSource::boxed("offline", false, Ok("never"));
        let (good, _) = FixedSource::boxed("good", true, Ok("EXTRATO"));

        let acquirer = TextAcquirer::with_sources(vec![offline, good]);
        assert_eq!(acquirer.acquire(b"%PDF").unwrap(), "EXTRATO");
        assert_eq!(offline_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_failing_yields_empty_text() {
        let (failing, _) = FixedSource::boxed("failing", true, Err("broken"));
        let acquirer = TextAcquirer::with_sources(vec![failing]);
        assert_eq!(acquirer.acquire(b"%PDF").unwrap(), "");
    }

    #[test]
    fn test_no_available_source() {
        let (offline, _) = FixedSource::boxed("offline", false, Ok("never"));
        let acquirer = TextAcquirer::with_sources(vec![offline]);
        assert!(matches!(
            acquirer.acquire(b"%PDF"),
            Err(PdfError::NoSourceAvailable)
        ));

        let acquirer = TextAcquirer::with_sources(Vec::new());
        assert!(matches!(
            acquirer.acquire(b"%PDF"),
            Err(PdfError::NoSourceAvailable)
        ));
    }

    #[test]
    fn test_min_text_length() {
        let (short, _) = FixedSource::boxed("short", true, Ok("ab"));
        let acquirer = TextAcquirer::with_sources(vec![short]).with_min_text_length(3);
        assert_eq!(acquirer.acquire(b"%PDF").unwrap(), "");
    }

    #[test]
    fn test_from_config() {
        let config = PdfConfig::default();
        let acquirer = TextAcquirer::from_config(&config).unwrap();
        assert_eq!(acquirer.source_names(), vec!["pdf-extract", "lopdf"]);

        let config = PdfConfig {
            sources: vec!["lopdf".to_string(), "tesseract".to_string()],
            min_text_length: 1,
        };
        let err = TextAcquirer::from_config(&config).err().unwrap();
        assert!(matches!(err, CnisError::Config(ref msg) if msg.contains("tesseract")));
    }

    #[test]
    fn test_read_plain_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cnis.TXT");
        std::fs::write(&path, "CPF: 111.222.333-44").unwrap();

        let text = TextAcquirer::new().read_path(&path).unwrap();
        assert_eq!(text, "CPF: 111.222.333-44");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextAcquirer::new()
            .read_path(&dir.path().join("missing.pdf"))
            .unwrap_err();
        assert!(matches!(err, CnisError::Io(_)));
    }
}
