//! Two-decimal money formatting for display.

use serde::{Deserialize, Serialize};

const DISPLAY_PRECISION: usize = 2;

/// Separator preferences for rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

/// Formats `value` with two decimals and digit grouping, e.g. `1,234.50`.
pub fn format_number(locale: &LocaleConfig, value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let body = format!("{:.*}", DISPLAY_PRECISION, value.abs());
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), ""));
    let grouped = group_digits(int_part, locale.grouping_separator);
    let sign = if value < 0.0 && body.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{}{frac_part}", locale.decimal_separator)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats an amount with the currency symbol, e.g. `$1,234.50`.
pub fn format_money(amount: f64, currency: &str, locale: &LocaleConfig) -> String {
    let body = format_number(locale, amount);
    let symbol = symbol_for(&currency.to_uppercase());
    match body.strip_prefix('-') {
        Some(unsigned) => format!("-{symbol}{unsigned}"),
        None => format!("{symbol}{body}"),
    }
}
