//! Number formatting in the Polish locale.

use super::metadata::CurrencyInfo;

const NBSP: char = '\u{a0}';

/// Formats `value` the way pl-PL renders currency amounts: space grouped
/// thousands, decimal comma, symbol after the number.
///
/// pl-PL leaves four-digit integers ungrouped (`1234,50`).
pub fn format_money(value: f64, currency: &CurrencyInfo) -> String {
    let fixed = format!("{:.*}", currency.minor_units as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out.push(NBSP);
    out.push_str(currency.display_symbol());
    out
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(c);
    }
    grouped
}

/// Rate with four decimals, as printed in the rate summary and history rows.
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.4}")
}
