//! Date handling for CNIS statements.
//!
//! CNIS prints full dates as `dd/mm/yyyy` and competence months as
//! `mm/yyyy`. A competence month stands for its last calendar day.

use chrono::NaiveDate;
use tracing::warn;

use super::patterns::{FULL_DATE, MONTH_YEAR, MONTH_YEAR_EXACT};

/// Earliest year accepted in a `mm/yyyy` value.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted in a `mm/yyyy` value.
pub const MAX_YEAR: i32 = 2100;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Kind of date found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// `dd/mm/yyyy`, kept as printed.
    Full,
    /// `mm/yyyy`, resolved to the last day of the month.
    MonthYear,
}

/// A date found in a line, already in `dd/mm/yyyy` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    pub value: String,
    pub kind: DateKind,
    /// Byte offset in the scanned line.
    pub position: usize,
}

/// Last calendar day of `month` in `year`.
///
/// Returns `None` when the month is not 1-12 or the year is outside
/// [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn last_day_of_month(month: u32, year: i32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// `dd/mm/yyyy` of the last day of a `mm/yyyy` value, or `None` when
/// the month or year is out of range.
pub fn resolve_month_year(input: &str) -> Option<String> {
    let caps = MONTH_YEAR_EXACT.captures(input.trim())?;
    let month: u32 = caps[1].parse().ok()?;
    let year: i32 = caps[2].parse().ok()?;

    last_day_of_month(month, year).map(|date| date.format(DATE_FORMAT).to_string())
}

/// Convert `mm/yyyy` into the `dd/mm/yyyy` of the month's last day.
///
/// Anything that cannot be converted is returned unchanged, with a
/// warning. Callers treat that as "normalization skipped".
pub fn normalize_month_year(input: &str) -> String {
    resolve_month_year(input).unwrap_or_else(|| {
        warn!("Could not convert month/year {:?}", input);
        input.to_string()
    })
}

/// Collect the dates of one line in appearance order.
///
/// Full dates are kept verbatim. A `mm/yyyy` value counts only when it
/// is not part of a full date and has a valid month and year.
pub fn scan_dates(line: &str) -> Vec<DateCandidate> {
    let mut candidates: Vec<DateCandidate> = FULL_DATE
        .find_iter(line)
        .map(|m| DateCandidate {
            value: m.as_str().to_string(),
            kind: DateKind::Full,
            position: m.start(),
        })
        .collect();

    let full_spans: Vec<(usize, usize)> = FULL_DATE
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .collect();

    for caps in MONTH_YEAR.captures_iter(line) {
        let Some(m) = caps.get(0) else { continue };
        if full_spans
            .iter()
            .any(|&(start, end)| m.start() < end && start < m.end())
        {
            continue;
        }

        let Some(value) = resolve_month_year(m.as_str()) else {
            continue;
        };

        candidates.push(DateCandidate {
            value,
            kind: DateKind::MonthYear,
            position: m.start(),
        });
    }

    candidates.sort_by_key(|c| c.position);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_normalize_month_lengths() {
        assert_eq!(normalize_month_year("03/2015"), "31/03/2015");
        assert_eq!(normalize_month_year("04/2015"), "30/04/2015");
        assert_eq!(normalize_month_year("02/2015"), "28/02/2015");
        assert_eq!(normalize_month_year("02/2016"), "29/02/2016");
        assert_eq!(normalize_month_year("02/2000"), "29/02/2000");
        assert_eq!(normalize_month_year("02/1900"), "28/02/1900");
    }

    #[test]
    fn test_normalize_december_stays_in_year() {
        assert_eq!(normalize_month_year("12/2019"), "31/12/2019");
        assert_eq!(normalize_month_year("12/2100"), "31/12/2100");
    }

    #[test]
    fn test_normalize_invalid_returns_input() {
        assert_eq!(normalize_month_year("13/2020"), "13/2020");
        assert_eq!(normalize_month_year("00/2020"), "00/2020");
        assert_eq!(normalize_month_year("05/1850"), "05/1850");
        assert_eq!(normalize_month_year("sem data"), "sem data");
    }

    #[test]
    fn test_resolve_rejects_what_normalize_passes_through() {
        assert_eq!(resolve_month_year("03/2015").as_deref(), Some("31/03/2015"));
        assert_eq!(resolve_month_year("13/2020"), None);
        assert_eq!(resolve_month_year("05/1850"), None);
        assert_eq!(resolve_month_year("sem data"), None);
    }

    #[test]
    fn test_last_day_is_within_month() {
        for year in [1900, 1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let date = last_day_of_month(month, year).unwrap();
                assert!(date.day() >= 28, "{month}/{year} -> {date}");
                assert_eq!(date.month(), month);
                assert_eq!(date.year(), year);
                assert_eq!(date.succ_opt().unwrap().day(), 1);
            }
        }
    }

    #[test]
    fn test_last_day_rejects_out_of_range() {
        assert_eq!(last_day_of_month(0, 2020), None);
        assert_eq!(last_day_of_month(13, 2020), None);
        assert_eq!(last_day_of_month(6, 1899), None);
        assert_eq!(last_day_of_month(6, 2101), None);
    }

    #[test]
    fn test_scan_skips_month_year_inside_full_dates() {
        let found = scan_dates("01/03/2010 28/02/2015");
        let values: Vec<&str> = found.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["01/03/2010", "28/02/2015"]);
    }

    #[test]
    fn test_scan_mixes_kinds_in_order() {
        let found = scan_dates("01/03/2010 03/2015");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].value, "01/03/2010");
        assert_eq!(found[0].kind, DateKind::Full);
        assert_eq!(found[1].value, "31/03/2015");
        assert_eq!(found[1].kind, DateKind::MonthYear);

        let found = scan_dates("competência 05/2012 até 01/06/2013");
        assert_eq!(found[0].value, "31/05/2012");
        assert_eq!(found[1].value, "01/06/2013");
    }

    #[test]
    fn test_scan_drops_invalid_month_year() {
        assert!(scan_dates("13/2020 99/1800").is_empty());
    }
}
