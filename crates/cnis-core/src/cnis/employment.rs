//! Employment record extraction from one section.

use tracing::debug;

use crate::models::record::EmploymentRecord;

use super::rules::dates::{resolve_month_year, scan_dates};
use super::rules::patterns::{
    BIRTH_DATE_ANY, BIRTH_MENTION, CNPJ_ANY, CNPJ_WRAPPED, CONTINUATION_STOP,
    EMPLOYEE_TYPE_SUFFIX, EMPLOYER_LINE, FULL_DATE, FULL_DATE_MONTH_YEAR, GROUPING_LINE,
    INDEXED_UPPERCASE, LEADING_INDEX, TWO_FULL_DATES,
};
use super::rules::text::{collapse_whitespace, title_case};
use super::rules::{cnpj_root, CnpjExtractor, FieldExtractor};
use super::sections::Section;

/// Builds an [`EmploymentRecord`] from a section.
pub struct EmploymentExtractor {
    validate_cnpj: bool,
    max_continuation_lines: usize,
}

impl EmploymentExtractor {
    pub fn new() -> Self {
        Self {
            validate_cnpj: false,
            max_continuation_lines: 3,
        }
    }

    /// Set whether complete CNPJs must have valid check digits.
    pub fn with_cnpj_validation(mut self, validate: bool) -> Self {
        self.validate_cnpj = validate;
        self
    }

    /// Set how many lines after the employer line may continue its name.
    pub fn with_max_continuation_lines(mut self, lines: usize) -> Self {
        self.max_continuation_lines = lines;
        self
    }

    /// Extract a record, or `None` when no employer can be found.
    ///
    /// `birth_date` is the account holder's birth date; it is never
    /// reported as a start or end date.
    pub fn extract(
        &self,
        section: &Section<'_>,
        birth_date: Option<&str>,
    ) -> Option<EmploymentRecord> {
        let lines = section.lines.as_slice();

        let mut registration_number = CnpjExtractor::new()
            .with_validation(self.validate_cnpj)
            .extract(&lines.join(" "))
            .map(|m| {
                debug!("CNPJ {} found in {:?}", m.value, m.source);
                m.value
            })
            .unwrap_or_default();

        let employer = match self.employer_from_record_line(lines) {
            Some((name, line_cnpj)) => {
                if registration_number.is_empty() {
                    registration_number = line_cnpj.unwrap_or_default();
                }
                Some(name)
            }
            None if !registration_number.is_empty() => self
                .employer_near_cnpj(lines, &registration_number)
                .or_else(|| self.employer_from_wrapped_record(lines)),
            None => self.employer_from_wrapped_record(lines),
        };

        let Some(employer) = employer.map(|e| clean_employer(&e)).filter(|e| !e.is_empty())
        else {
            debug!("Section at line {} has no employer, skipped", section.start_line);
            return None;
        };

        let section_birth_date = birth_date
            .map(str::to_string)
            .or_else(|| birth_date_in_section(lines));
        let (start_date, end_date) = extract_dates(lines, section_birth_date.as_deref());

        debug!(
            "Record at line {}: {:?} ({}) {} - {}",
            section.start_line, employer, registration_number, start_date, end_date
        );

        Some(EmploymentRecord {
            employer,
            registration_number,
            start_date,
            end_date,
        })
    }

    /// `N <cnpj> <name>` or `N AGRUPAMENTO ...`, plus continuation lines.
    fn employer_from_record_line(&self, lines: &[&str]) -> Option<(String, Option<String>)> {
        lines.iter().enumerate().find_map(|(i, line)| {
            if let Some(caps) = EMPLOYER_LINE.captures(line) {
                let name = self.with_continuation(&caps[2], &lines[i + 1..]);
                return Some((name, Some(caps[1].to_string())));
            }

            GROUPING_LINE
                .captures(line)
                .map(|caps| (self.with_continuation(&caps[1], &lines[i + 1..]), None))
        })
    }

    /// First line holding the CNPJ root with enough text left after
    /// removing registration numbers and the leading index.
    fn employer_near_cnpj(&self, lines: &[&str], cnpj: &str) -> Option<String> {
        let root = cnpj_root(cnpj);

        lines.iter().enumerate().find_map(|(i, line)| {
            if !line.contains(root) {
                return None;
            }

            let rest = strip_registration_numbers(line);
            let rest = LEADING_INDEX.replace(&rest, "");
            let rest = rest.trim();

            (rest.chars().count() > 3).then(|| self.with_continuation(rest, &lines[i + 1..]))
        })
    }

    /// `N NAME` as the first line, with the CNPJ on the line after it.
    fn employer_from_wrapped_record(&self, lines: &[&str]) -> Option<String> {
        let first = lines.first()?;
        if !INDEXED_UPPERCASE.is_match(first) {
            return None;
        }

        let name = LEADING_INDEX.replace(first, "");
        Some(self.with_continuation(&name, &lines[1..]))
    }

    fn with_continuation(&self, head: &str, following: &[&str]) -> String {
        let mut name = head.trim().to_string();

        for line in following.iter().take(self.max_continuation_lines) {
            let line = line.trim();
            if ends_employer_name(line) {
                break;
            }
            name.push(' ');
            name.push_str(line);
        }

        name
    }
}

impl Default for EmploymentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A continuation stops at dates, indexed lines, field labels and
/// fragments shorter than 3 characters.
fn ends_employer_name(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit())
        || CONTINUATION_STOP.is_match(line)
        || line.chars().count() < 3
}

fn strip_registration_numbers(text: &str) -> String {
    let text = CNPJ_WRAPPED.replace_all(text, "");
    CNPJ_ANY.replace_all(&text, "").into_owned()
}

fn clean_employer(raw: &str) -> String {
    let name = EMPLOYEE_TYPE_SUFFIX.replace(raw, "");
    let name = strip_registration_numbers(&name);
    title_case(&collapse_whitespace(&name))
}

fn birth_date_in_section(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| BIRTH_DATE_ANY.captures(line).map(|c| c[1].to_string()))
}

/// Start and end dates of a section. Empty strings when not found.
fn extract_dates(lines: &[&str], birth_date: Option<&str>) -> (String, String) {
    let mut found: Vec<String> = Vec::new();

    for line in lines.iter().filter(|l| !BIRTH_MENTION.is_match(l)) {
        for candidate in scan_dates(line) {
            if birth_date == Some(candidate.value.as_str()) || found.contains(&candidate.value) {
                continue;
            }
            found.push(candidate.value);
        }
    }

    let mut found = found.into_iter();
    match (found.next(), found.next()) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, String::new()),
        _ => fallback_dates(lines, birth_date),
    }
}

/// Explicit date layouts over every line, birth date lines included.
///
/// Until a start date is known, the first line with two dates (or a
/// date and a valid competence month) decides both. Lone dates fill the
/// start, then a different end.
fn fallback_dates(lines: &[&str], birth_date: Option<&str>) -> (String, String) {
    let is_birth = |date: &str| birth_date == Some(date);
    let mut start = String::new();
    let mut end = String::new();

    for line in lines {
        if start.is_empty() {
            if let Some(caps) = TWO_FULL_DATES
                .captures_iter(line)
                .find(|c| !is_birth(&c[1]) && !is_birth(&c[2]))
            {
                return (caps[1].to_string(), caps[2].to_string());
            }

            if let Some(pair) = FULL_DATE_MONTH_YEAR.captures_iter(line).find_map(|c| {
                let end = resolve_month_year(&c[2])?;
                (!is_birth(&c[1]) && !is_birth(&end)).then(|| (c[1].to_string(), end))
            }) {
                return pair;
            }
        }

        for date in FULL_DATE.find_iter(line).map(|m| m.as_str()) {
            if is_birth(date) {
                continue;
            }
            if start.is_empty() {
                start = date.to_string();
            } else if end.is_empty() && date != start {
                end = date.to_string();
            }
        }

        if !end.is_empty() {
            break;
        }
    }

    (start, end)
}
