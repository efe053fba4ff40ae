//! Cell-level parsing and formatting.
//!
//! Every parser here is total: a cell that cannot be read as the requested
//! type yields `None` rather than an error. Dirty exports are expected to be
//! full of junk and the pipeline treats unreadable cells as missing data.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_OUTPUT_SCALE: u32 = 4;

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// Reads a categorical cell. Empty cells and sentinel tokens are missing.
///
/// Sentinel matching is exact and case-sensitive.
pub fn parse_label(value: &str, sentinels: &[String]) -> Option<String> {
    if value.trim().is_empty() || sentinels.iter().any(|token| token == value) {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Reads an integer cell, accepting integral decimals such as `3.0`.
pub fn parse_integer(value: &str) -> Option<i64> {
    let parsed = parse_decimal(value)?;
    if parsed.fract().is_zero() {
        parsed.to_i64()
    } else {
        None
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_naive_date(trimmed)
        .or_else(|_| parse_naive_datetime(trimmed).map(|dt| dt.date()))
        .ok()
}

/// Reads a quantity that may be written as digits or as English words.
///
/// Digits are truncated toward zero (`"12.7"` -> 12). Words follow the usual
/// short-scale reading: `"one hundred and two"` -> 102.
pub fn parse_worded_integer(value: &str) -> Option<i64> {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    if let Some(parsed) = parse_decimal(&lowered) {
        return parsed.trunc().to_i64();
    }
    parse_number_words(&lowered)
}

fn parse_number_words(text: &str) -> Option<i64> {
    let mut total: i64 = 0;
    let mut current: i64 = 0;
    let mut seen_number = false;
    for word in text
        .split(|c: char| c.is_whitespace() || c == '-' || c == ',')
        .filter(|w| !w.is_empty())
    {
        if word == "and" {
            continue;
        }
        if let Some(small) = small_number(word) {
            current = current.checked_add(small)?;
        } else if word == "hundred" {
            current = current.max(1).checked_mul(100)?;
        } else if let Some(scale) = scale_number(word) {
            total = total.checked_add(current.max(1).checked_mul(scale)?)?;
            current = 0;
        } else {
            return None;
        }
        seen_number = true;
    }
    if seen_number {
        total.checked_add(current)
    } else {
        None
    }
}

fn small_number(word: &str) -> Option<i64> {
    const UNITS: [&str; 20] = [
        "zero",
        "one",
        "two",
        "three",
        "four",
        "five",
        "six",
        "seven",
        "eight",
        "nine",
        "ten",
        "eleven",
        "twelve",
        "thirteen",
        "fourteen",
        "fifteen",
        "sixteen",
        "seventeen",
        "eighteen",
        "nineteen",
    ];
    const TENS: [&str; 8] = [
        "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    ];
    if let Some(pos) = UNITS.iter().position(|u| *u == word) {
        return Some(pos as i64);
    }
    TENS.iter()
        .position(|t| *t == word)
        .map(|pos| (pos as i64 + 2) * 10)
}

fn scale_number(word: &str) -> Option<i64> {
    match word {
        "thousand" => Some(1_000),
        "million" => Some(1_000_000),
        "billion" => Some(1_000_000_000),
        _ => None,
    }
}

/// Renders a decimal with one to four fractional digits (`2.0`, `1.3333`).
pub fn format_decimal(value: &Decimal) -> String {
    let rounded = value.round_dp(MAX_OUTPUT_SCALE).normalize();
    if rounded.scale() == 0 {
        format!("{rounded}.0")
    } else {
        rounded.to_string()
    }
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn format_optional<T>(value: Option<&T>, render: impl Fn(&T) -> String) -> String {
    value.map(render).unwrap_or_default()
}
