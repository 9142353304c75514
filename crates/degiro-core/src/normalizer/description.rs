//! Stage (c): description free-text parsing.
//!
//! Three recognized prefixes encode an executed fill: `Compra`/`Venta`
//! (buy/sell), `ESCISIÓN …: …` (spin-off), `VENCIMIENTO …: …` (expiry).
//! Anything else yields an all-null fill (the row is retained regardless —
//! malformed descriptions are a local failure, not a fatal one).

use crate::locale::parse_desc_decimal;
use crate::models::Action;

pub struct ParsedFill {
    pub action: Action,
    pub number: Option<rust_decimal::Decimal>,
    pub price: Option<rust_decimal::Decimal>,
    pub price_currency: Option<String>,
}

impl ParsedFill {
    fn none() -> Self {
        Self {
            action: Action::None,
            number: None,
            price: None,
            price_currency: None,
        }
    }
}

pub fn parse_description(desc: &str) -> ParsedFill {
    let desc = desc.trim();

    if let Some(fill) = desc.strip_prefix("Compra").map(|rest| ("buy", rest)) {
        return parse_fill_body(fill.0, fill.1);
    }
    if let Some(fill) = desc.strip_prefix("Venta").map(|rest| ("sell", rest)) {
        return parse_fill_body(fill.0, fill.1);
    }
    if desc.starts_with("ESCISI") {
        if let Some((_, rest)) = desc.split_once(": ") {
            return parse_tagged_fill(rest);
        }
        return ParsedFill::none();
    }
    if desc.starts_with("VENCIMIENTO") {
        if let Some((_, rest)) = desc.split_once(": ") {
            return parse_tagged_fill(rest);
        }
        return ParsedFill::none();
    }

    ParsedFill::none()
}

/// Parse `"N @ P CCY"` prefixed by the Spanish action word already stripped
/// (e.g. `" 10 @ 25,50 EUR"` for `Compra`).
fn parse_fill_body(action_word: &str, rest: &str) -> ParsedFill {
    let action = match action_word {
        "buy" => Action::Buy,
        "sell" => Action::Sell,
        _ => return ParsedFill::none(),
    };
    parse_number_at_price(action, rest)
}

/// Parse `"side N @ P CCY"` where `side` is the Spanish action word, for
/// ESCISIÓN/VENCIMIENTO bodies after the `": "` prefix has been stripped.
fn parse_tagged_fill(body: &str) -> ParsedFill {
    let Some((side_and_number, price_and_ccy)) = body.split_once('@') else {
        return ParsedFill::none();
    };
    let mut words = side_and_number.split_whitespace();
    let Some(side_word) = words.next() else {
        return ParsedFill::none();
    };
    let action = match side_word {
        "Compra" => Action::Buy,
        "Venta" => Action::Sell,
        _ => return ParsedFill::none(),
    };
    let Some(number_str) = words.next() else {
        return ParsedFill::none();
    };
    let Some(number) = parse_desc_decimal(number_str) else {
        return ParsedFill::none();
    };
    finish_price(action, number, price_and_ccy)
}

fn parse_number_at_price(action: Action, rest: &str) -> ParsedFill {
    let Some((number_str, price_and_ccy)) = rest.split_once('@') else {
        return ParsedFill::none();
    };
    let Some(number) = parse_desc_decimal(number_str.trim()) else {
        return ParsedFill::none();
    };
    finish_price(action, number, price_and_ccy)
}

fn finish_price(action: Action, number: rust_decimal::Decimal, price_and_ccy: &str) -> ParsedFill {
    let mut parts = price_and_ccy.split_whitespace();
    let Some(price_str) = parts.next() else {
        return ParsedFill::none();
    };
    let Some(price) = parse_desc_decimal(price_str) else {
        return ParsedFill::none();
    };
    let price_currency = parts.next().map(|s| s.to_string());
    ParsedFill {
        action,
        number: Some(number),
        price: Some(price),
        price_currency,
    }
}
