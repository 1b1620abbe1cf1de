// Utility helpers for cell coercion and number formatting.
//
// This module centralizes all the "dirty" spreadsheet handling so the
// normalizer can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

use crate::error::{DataError, Result};
use crate::loader::Cell;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (this also rejects
///   the literal text `NaN`).
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Numeric value of a cell. Never returns NaN or infinity.
pub fn cell_f64(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if n.is_finite() => Some(*n),
        Cell::Text(s) => parse_f64_safe(Some(s)),
        _ => None,
    }
}

/// Largest count a cell may hold; anything above is a data-entry error.
pub const MAX_COUNT: u64 = 1_000_000_000_000;

/// Non-negative integer count, truncating fractional values.
pub fn cell_count(cell: &Cell) -> Result<u64> {
    match cell_f64(cell) {
        Some(v) if v > MAX_COUNT as f64 => {
            Err(DataError::RowMalformed(format!("count {} out of range", v)))
        }
        Some(v) if v >= 0.0 => Ok(v.trunc() as u64),
        Some(v) => Err(DataError::RowMalformed(format!("negative count {}", v))),
        None => Err(DataError::RowMalformed(format!("not a number: {:?}", cell))),
    }
}

/// Case count policy: anything unparsable counts as zero.
pub fn cell_count_or_zero(cell: &Cell) -> u64 {
    cell_count(cell).unwrap_or(0)
}

/// Trimmed, non-blank text of a cell. Text reading `NaN` counts as blank.
pub fn cell_text(cell: &Cell) -> Option<String> {
    let s = match cell {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) if !n.is_finite() => return None,
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Cell::Number(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
        Cell::Date(dt) => dt.date().format("%Y-%m-%d").to_string(),
        Cell::Empty => return None,
    };
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s)
    }
}

pub fn cell_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date_safe(Some(s)),
        _ => None,
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// "larkana district" -> "Larkana District"
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
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

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed number of decimal places with locale-aware thousands separators
    // (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console and alert messages (e.g., `62,096 cases`).
    n.to_formatted_string(&Locale::en)
}
