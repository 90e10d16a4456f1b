//! Date canonicalization.
//!
//! Dates reach the client in several shapes: `2026-01-22` from date pickers,
//! `2026. 1. 22` echoed back by the spreadsheet, or full ISO timestamps. All
//! of them are reduced to `YYYY-MM-DD` so records can be compared and grouped.

use std::sync::LazyLock;

use regex::Regex;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Canonicalizes a date-like string to `YYYY-MM-DD`.
///
/// The first three runs of digits are read as year, month and day. Month and
/// day are zero-padded to two digits. Inputs with fewer than three digit runs
/// are returned trimmed and otherwise unchanged.
///
/// No calendar validation happens here: `2026-13-40` stays `2026-13-40`.
pub fn normalize_date(input: &str) -> String {
    let mut runs = DIGIT_RUN.find_iter(input).map(|m| m.as_str());

    match (runs.next(), runs.next(), runs.next()) {
        (Some(year), Some(month), Some(day)) => {
            format!("{}-{:0>2}-{:0>2}", year, month, day)
        }
        _ => input.trim().to_string(),
    }
}

/// Returns true if two date strings refer to the same canonical day.
pub fn same_day(a: &str, b: &str) -> bool {
    normalize_date(a) == normalize_date(b)
}
