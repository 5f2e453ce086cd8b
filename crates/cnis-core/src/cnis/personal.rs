//! Personal data extraction from the statement header.

use tracing::debug;

use crate::models::record::PersonalData;

use super::rules::patterns::{
    BIRTH_DATE_LABELED, BIRTH_DATE_SHORT, NAME_BARE_LINE, NAME_LABELED, NAME_NOISE,
    NAME_RESERVED_PREFIX, NAME_WITH_CPF, NAME_WITH_NIT_CPF,
};
use super::rules::text::{collapse_whitespace, title_case};
use super::rules::{first_match, CpfExtractor, FieldExtractor, Matcher};

/// Per-line name matchers, in priority order.
const LINE_NAME_MATCHERS: &[Matcher<String>] =
    &[name_with_nit_cpf, name_with_cpf, name_labeled, name_bare_line];

/// Birth date matchers, in priority order.
const BIRTH_DATE_MATCHERS: &[Matcher<String>] = &[birth_date_labeled, birth_date_short];

/// Extracts name, CPF and birth date from the whole document text.
pub struct PersonalDataExtractor {
    validate_cpf: bool,
}

impl PersonalDataExtractor {
    pub fn new() -> Self {
        Self {
            validate_cpf: false,
        }
    }

    /// Set whether CPF candidates must have valid check digits.
    pub fn with_cpf_validation(mut self, validate: bool) -> Self {
        self.validate_cpf = validate;
        self
    }

    /// Extract personal data. Fields that cannot be found stay empty.
    pub fn extract(&self, text: &str) -> PersonalData {
        let national_id = CpfExtractor::new()
            .with_validation(self.validate_cpf)
            .extract(text)
            .map(|m| {
                debug!("CPF {} found in {:?} at {:?}", m.value, m.source, m.position);
                m.value
            })
            .unwrap_or_default();

        let name = extract_name(text).unwrap_or_default();
        let birth_date = first_match(BIRTH_DATE_MATCHERS, text).unwrap_or_default();

        debug!(
            "Personal data: name={:?}, cpf={:?}, birth_date={:?}",
            name, national_id, birth_date
        );

        PersonalData {
            name,
            national_id,
            birth_date,
        }
    }
}

impl Default for PersonalDataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the account holder's name.
///
/// The NIT/CPF/Nome header block is tried on the whole text first, then
/// each line is tried against [`LINE_NAME_MATCHERS`].
pub fn extract_name(text: &str) -> Option<String> {
    if let Some(name) = name_from_header_block(text) {
        return Some(name);
    }

    text.lines()
        .map(str::trim)
        .find_map(|line| first_match(LINE_NAME_MATCHERS, line))
}

fn name_from_header_block(text: &str) -> Option<String> {
    let caps = NAME_WITH_NIT_CPF.captures(text)?;
    let name = clean_name(&caps[1]);

    if name.chars().count() > 5 && name.contains(' ') {
        Some(title_case(&name))
    } else {
        None
    }
}

fn name_with_nit_cpf(line: &str) -> Option<String> {
    accept_name(&NAME_WITH_NIT_CPF.captures(line)?[1])
}

fn name_with_cpf(line: &str) -> Option<String> {
    accept_name(&NAME_WITH_CPF.captures(line)?[1])
}

fn name_labeled(line: &str) -> Option<String> {
    accept_name(&NAME_LABELED.captures(line)?[1])
}

fn name_bare_line(line: &str) -> Option<String> {
    accept_name(&NAME_BARE_LINE.captures(line)?[1])
}

/// Clean a raw candidate and keep it only if it looks like a full name.
fn accept_name(raw: &str) -> Option<String> {
    let name = clean_name(raw);

    let plausible = name.chars().count() > 5
        && !name.chars().all(|c| c.is_ascii_digit())
        && name.contains(' ')
        && !NAME_RESERVED_PREFIX.is_match(&name.to_uppercase());

    plausible.then(|| title_case(&name))
}

fn clean_name(raw: &str) -> String {
    collapse_whitespace(&NAME_NOISE.replace_all(raw, ""))
}

fn birth_date_labeled(text: &str) -> Option<String> {
    BIRTH_DATE_LABELED.captures(text).map(|c| c[1].to_string())
}

fn birth_date_short(text: &str) -> Option<String> {
    BIRTH_DATE_SHORT.captures(text).map(|c| c[1].to_string())
}
