//! Spanish-locale parsing helpers shared by the Normalizer stages: dates are
//! `dd/mm/YYYY`, times are `HH:MM`, and numbers use `,` as the decimal
//! separator (with `.` as an optional thousands separator inside free-text
//! descriptions).

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Parse a `var`/`cash` column value: decimal comma swapped for a dot, no
/// thousands-separator handling (per the Normalizer's type-coercion stage).
pub fn parse_var_cash_decimal(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Parse a number embedded in a free-text description: thousands separator
/// `.` stripped, decimal separator `,` swapped for a dot.
pub fn parse_desc_decimal(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Parse a `curr_rate` field the same way as a description number: it is
/// carried as a raw locale string until the commission/FX attachment stage.
pub fn parse_rate_decimal(s: &str) -> Option<Decimal> {
    parse_var_cash_decimal(s)
}
