//! Splitting a CNIS statement into per-employer sections.
//!
//! The splitter is a single pass over the trimmed lines of the document,
//! folded through a two-state machine: outside any section, or inside one
//! with a line buffer. Each line is classified once, in precedence order:
//!
//! 1. record start (column header, `N dd.ddd.ddd...`, `N AGRUPAMENTO`, or
//!    `N NAME` followed by a line holding a CNPJ fragment)
//! 2. boundary keyword (`Relações Previdenciárias`, `TOTAIS`, ...)
//! 3. blank line right before a record marker
//! 4. orphan CNPJ line with uppercase text nearby
//! 5. anything else

use tracing::debug;

use super::rules::patterns::{
    CNPJ_PARTIAL, COLUMN_HEADER, GROUPING_RECORD, INDEXED_UPPERCASE, LEADING_CNPJ,
    REGISTRATION_RECORD, SECTION_END, UPPERCASE_RUN, UPPERCASE_WORD,
};

/// Lines searched on each side of an orphan CNPJ line for employer text.
const CONTEXT_RADIUS: usize = 2;

/// A contiguous run of document lines describing one employment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Zero-based index of the first line in the document.
    pub start_line: usize,
    /// Trimmed lines, in document order.
    pub lines: Vec<&'a str>,
}

impl<'a> Section<'a> {
    fn new(start_line: usize, first: &'a str) -> Self {
        Self {
            start_line,
            lines: vec![first],
        }
    }

    fn push(&mut self, line: &'a str) {
        self.lines.push(line);
    }

    /// Zero-based index of the last line in the document.
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines.len().saturating_sub(1)
    }

    /// Number of lines that are not blank.
    pub fn non_blank_lines(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_empty()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    /// Opens a new section. `pull_next` when the next line holds the CNPJ
    /// of a record whose first line does not.
    RecordStart { pull_next: bool },
    Boundary,
    BlankBeforeRecord,
    OrphanRegistration,
    Plain,
}

enum ScanState<'a> {
    Outside,
    InSection(Section<'a>),
}

struct Scan<'a> {
    state: ScanState<'a>,
    sections: Vec<Section<'a>>,
    /// Line already pulled into a section by the previous step.
    consumed: Option<usize>,
}

impl<'a> Scan<'a> {
    fn new() -> Self {
        Self {
            state: ScanState::Outside,
            sections: Vec::new(),
            consumed: None,
        }
    }

    fn step(mut self, lines: &[&'a str], index: usize) -> Self {
        if self.consumed == Some(index) {
            self.consumed = None;
            return self;
        }

        let line = lines[index];
        let state = std::mem::replace(&mut self.state, ScanState::Outside);

        self.state = match (classify(lines, index), state) {
            (LineKind::RecordStart { pull_next }, state) => {
                self.flush(state);
                let mut section = Section::new(index, line);
                if pull_next {
                    if let Some(next) = lines.get(index + 1) {
                        section.push(next);
                        self.consumed = Some(index + 1);
                    }
                }
                ScanState::InSection(section)
            }
            (LineKind::Boundary | LineKind::BlankBeforeRecord, ScanState::InSection(mut section)) => {
                section.push(line);
                self.sections.push(section);
                ScanState::Outside
            }
            (LineKind::OrphanRegistration, ScanState::Outside) => {
                ScanState::InSection(Section::new(index, line))
            }
            (_, ScanState::InSection(mut section)) => {
                section.push(line);
                ScanState::InSection(section)
            }
            (_, ScanState::Outside) => ScanState::Outside,
        };

        self
    }

    fn flush(&mut self, state: ScanState<'a>) {
        if let ScanState::InSection(section) = state {
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> Vec<Section<'a>> {
        let state = std::mem::replace(&mut self.state, ScanState::Outside);
        self.flush(state);
        self.sections
    }
}

fn is_record_marker(line: &str) -> bool {
    REGISTRATION_RECORD.is_match(line) || GROUPING_RECORD.is_match(line)
}

/// The next line is pulled in when it carries the CNPJ the current line
/// lacks, unless it is a record of its own.
fn pulls_next_line(line: &str, next: Option<&str>) -> bool {
    !CNPJ_PARTIAL.is_match(line)
        && next.is_some_and(|n| CNPJ_PARTIAL.is_match(n) && !is_record_marker(n))
}

fn has_uppercase_context(lines: &[&str], index: usize) -> bool {
    let from = index.saturating_sub(CONTEXT_RADIUS);
    let to = (index + CONTEXT_RADIUS).min(lines.len().saturating_sub(1));

    (from..=to)
        .filter(|&j| j != index)
        .any(|j| UPPERCASE_RUN.is_match(lines[j]))
}

fn classify(lines: &[&str], index: usize) -> LineKind {
    let line = lines[index];
    let next = lines.get(index + 1).copied();

    let wrapped_record =
        INDEXED_UPPERCASE.is_match(line) && next.is_some_and(|n| CNPJ_PARTIAL.is_match(n));

    if COLUMN_HEADER.is_match(line) || is_record_marker(line) || wrapped_record {
        return LineKind::RecordStart {
            pull_next: pulls_next_line(line, next),
        };
    }

    if SECTION_END.is_match(line) {
        return LineKind::Boundary;
    }

    if line.is_empty() && next.is_some_and(is_record_marker) {
        return LineKind::BlankBeforeRecord;
    }

    if LEADING_CNPJ.is_match(line) && has_uppercase_context(lines, index) {
        return LineKind::OrphanRegistration;
    }

    LineKind::Plain
}

/// Splits document text into employment sections.
pub struct SectionSplitter {
    min_lines: usize,
}

impl SectionSplitter {
    pub fn new() -> Self {
        Self { min_lines: 2 }
    }

    /// Sections with fewer non-blank lines are discarded.
    pub fn with_min_lines(mut self, min_lines: usize) -> Self {
        self.min_lines = min_lines;
        self
    }

    /// Split `text` into sections, in document order.
    pub fn split<'a>(&self, text: &'a str) -> Vec<Section<'a>> {
        let lines: Vec<&'a str> = text.lines().map(str::trim).collect();

        let sections = (0..lines.len())
            .fold(Scan::new(), |scan, index| scan.step(&lines, index))
            .finish();

        let total = sections.len();
        let kept: Vec<Section<'a>> = sections.into_iter().filter(|s| self.keep(s)).collect();

        debug!("Split {} lines into {} sections ({} kept)", lines.len(), total, kept.len());
        kept
    }

    /// A section must have enough lines and some employer evidence.
    /// `AGRUPAMENTO` is covered by the uppercase-word test.
    fn keep(&self, section: &Section<'_>) -> bool {
        section.non_blank_lines() >= self.min_lines
            && section
                .lines
                .iter()
                .any(|l| CNPJ_PARTIAL.is_match(l) || UPPERCASE_WORD.is_match(l))
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split with the default settings.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    SectionSplitter::new().split(text)
}
