//! Small text normalization helpers shared by the extractors.

use super::patterns::WHITESPACE_RUN;

/// Collapse whitespace runs to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// Any non-letter starts a new word, so `S/A` stays `S/A` and
/// `D'AVILA` becomes `D'Avila`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
