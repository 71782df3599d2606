//! Conversion of raw form values into simulation parameters.
//!
//! Malformed numbers fall back to zero instead of failing.

use chrono::NaiveDate;
use snafu::OptionExt;

use crate::angles::deg_to_rad;
use crate::error::{InvalidDateSnafu, Result};

/// Parse the longest numeric prefix of `input`, like a lenient form field.
/// Returns 0.0 when there is none or the value is not finite.
pub fn parse_float_or_zero(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let mut best = None;
    for (idx, ch) in trimmed.char_indices() {
        if !is_numeric_char(ch) {
            break;
        }
        if let Ok(value) = trimmed[..idx + ch.len_utf8()].parse::<f64>() {
            best = Some(value);
        }
    }
    match best {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')
}

/// Tilt in radians from a degree field, kept within `[0, π]`.
pub fn tilt_from_input(input: &str) -> f64 {
    deg_to_rad(parse_float_or_zero(input)).clamp(0.0, std::f64::consts::PI)
}

pub fn azimuth_from_input(input: &str) -> f64 {
    deg_to_rad(parse_float_or_zero(input))
}

pub fn area_from_input(input: &str) -> f64 {
    parse_float_or_zero(input).max(0.0)
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .context(InvalidDateSnafu { input })
}
