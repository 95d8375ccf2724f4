// Numeric parsing and formatting helpers.
//
// Credit quantities arrive as dirty spreadsheet cells and leave as
// thousands-separated console strings, so both directions live here.
use num_format::{Locale, ToFormattedString};

/// Parse a spreadsheet cell's text into `f64`, forgiving the formatting
/// quirks common in published workbooks.
///
/// Trims whitespace, strips thousands separators and inner spaces, and
/// rejects anything containing alphabetic characters so stray labels like
/// `"n/a"` or `"pending"` never become numbers.
pub fn parse_f64_safe(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    trimmed.replace([',', ' '], "").parse::<f64>().ok()
}

/// Render a credit quantity in whole tCO2eq with thousands separators.
///
/// Registry quantities sit far below i64 precision, so rounding through
/// i64 for `num-format` loses nothing.
pub fn format_credits(n: f64) -> String {
    let rounded = n.round();
    let formatted = (rounded.abs() as i64).to_formatted_string(&Locale::en);
    if rounded < 0.0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Render a rate with one decimal place (e.g. `37.5` for a percentage).
pub fn format_pct(n: f64) -> String {
    format!("{n:.1}")
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 projects loaded`).
    n.to_formatted_string(&Locale::en)
}
