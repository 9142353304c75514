//! The Normalizer (§4.2): turns raw, irregular CSV rows into the canonical
//! `Trade` table. Each stage below is a pure function over an explicit
//! `Vec<WorkRow>` pass — no query planner, just a hand-written scan per
//! stage, per the re-architecting notes this engine follows.

mod categorize;
mod commission_fx;
mod description;
mod isin_change;
mod order_merge;
mod orphan;

use crate::config::Config;
use crate::error::{DegiroError, Result};
use crate::locale::{parse_date, parse_desc_decimal, parse_time, parse_var_cash_decimal};
use crate::models::{Action, Category, RawRow, Trade, Warning};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Working representation of a row as it moves through the normalizer
/// stages. Fields are progressively filled in; by the time `into_trade` is
/// called every field needed by a canonical `Trade` must be present.
#[derive(Debug, Clone)]
pub(crate) struct WorkRow {
    pub idx: usize,
    pub had_reg_date: bool,
    pub reg_date: Option<NaiveDate>,
    pub reg_hour: Option<NaiveTime>,
    pub value_date: Option<NaiveDate>,
    pub timestamp: Option<NaiveDateTime>,
    pub product: String,
    pub isin: String,
    pub desc: String,
    /// Kept as a raw locale string until the commission/FX attachment
    /// stage, since an orphan-row merge can still touch it.
    pub curr_rate_raw: Option<String>,
    /// Resolved EUR FX rate, filled in by the commission/FX attachment stage.
    pub curr_rate: Option<Decimal>,
    pub varcur: String,
    pub var: Option<Decimal>,
    pub cashcur: String,
    pub cash: Option<Decimal>,
    pub order_id: Option<String>,
    pub action: Action,
    pub number: Option<Decimal>,
    pub price: Option<Decimal>,
    pub pricecur: Option<String>,
    pub unintended: bool,
    pub category: Category,
    pub commission: Option<Decimal>,
    pub isin_change: Option<String>,
}

/// Result of normalization: the canonical trade table plus the surfaced
/// ISIN-change pair map (`new_isin -> old_isin`) the Lot Matcher needs, and
/// any non-fatal diagnostics collected along the way.
pub struct NormalizedData {
    pub trades: Vec<Trade>,
    pub isin_change_pairs: HashMap<String, String>,
    pub warnings: Vec<Warning>,
}

pub fn normalize(raw_rows: Vec<RawRow>, config: &Config) -> Result<NormalizedData> {
    let mut warnings = Vec::new();

    // (a) + (b): combined timestamp and type coercion.
    let rows: Vec<WorkRow> = raw_rows
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| build_work_row(idx, raw))
        .collect();

    // (c): description parsing, applied before the orphan merge so a
    // truncated mother description is parsed as-is (matches the source).
    let rows: Vec<WorkRow> = rows.into_iter().map(apply_description).collect();

    // (d): orphan-row merge.
    let rows = orphan::merge_orphans(rows)?;

    // (e): unintended flag.
    let rows: Vec<WorkRow> = rows.into_iter().map(apply_unintended_flag).collect();

    // (f): order merge (collapse multi-fill orders).
    let rows = order_merge::merge_orders(rows, &mut warnings);

    // (g): commission & FX attachment.
    let rows = commission_fx::attach_commission_and_fx(rows)?;

    // (h): categorization.
    let rows: Vec<WorkRow> = rows
        .into_iter()
        .map(|r| categorize::categorize(r, config))
        .collect();

    // (i): ISIN-change linkage.
    let (rows, isin_change_pairs) = isin_change::link_isin_changes(rows);

    // Build canonical trades, then (j) dedup & sort ascending for matching.
    let mut trades: Vec<Trade> = rows
        .into_iter()
        .map(into_trade)
        .collect::<Result<Vec<_>>>()?;
    dedup_and_sort(&mut trades);

    Ok(NormalizedData {
        trades,
        isin_change_pairs,
        warnings,
    })
}

fn build_work_row(idx: usize, raw: RawRow) -> WorkRow {
    let reg_date = raw.reg_date.as_deref().and_then(parse_date);
    let reg_hour = raw.reg_hour.as_deref().and_then(parse_time);
    let value_date = raw.value_date.as_deref().and_then(parse_date);
    let timestamp = match (value_date, reg_hour) {
        (Some(d), Some(t)) => Some(NaiveDateTime::new(d, t)),
        (Some(d), None) => Some(d.and_time(NaiveTime::MIN)),
        _ => None,
    };

    WorkRow {
        idx,
        had_reg_date: raw.reg_date.is_some(),
        reg_date,
        reg_hour,
        value_date,
        timestamp,
        product: raw.product.unwrap_or_default(),
        isin: raw.isin.unwrap_or_default(),
        desc: raw.desc.unwrap_or_default(),
        curr_rate_raw: raw.curr_rate,
        curr_rate: None,
        varcur: raw.varcur.unwrap_or_default(),
        var: raw.var.as_deref().and_then(parse_var_cash_decimal),
        cashcur: raw.cashcur.unwrap_or_default(),
        cash: raw.cash.as_deref().and_then(parse_var_cash_decimal),
        order_id: raw.id_order,
        action: Action::None,
        number: None,
        price: None,
        pricecur: None,
        unintended: false,
        category: Category::None,
        commission: None,
        isin_change: None,
    }
}

fn apply_description(mut row: WorkRow) -> WorkRow {
    let fill = description::parse_description(&row.desc);
    row.action = fill.action;
    row.number = fill.number;
    row.price = fill.price;
    row.pricecur = fill.price_currency;
    row
}

fn apply_unintended_flag(mut row: WorkRow) -> WorkRow {
    row.unintended = row.action != Action::None && row.order_id.is_none();
    row
}

fn into_trade(row: WorkRow) -> Result<Trade> {
    let value_date = row.value_date.ok_or_else(|| DegiroError::ParseError {
        row: row.idx,
        message: "missing value_date".to_string(),
    })?;
    let timestamp = row.timestamp.unwrap_or_else(|| value_date.and_time(NaiveTime::MIN));

    let var = row.var.unwrap_or(Decimal::ZERO);
    let cash = row.cash.unwrap_or(Decimal::ZERO);

    let curr_rate = if row.cashcur == "EUR" {
        Decimal::ONE
    } else {
        row.curr_rate.ok_or_else(|| DegiroError::FxMissing {
            order_id: row.order_id.clone().unwrap_or_default(),
            currency: row.cashcur.clone(),
        })?
    };

    Ok(Trade {
        timestamp,
        value_date,
        product: row.product,
        isin: row.isin,
        description: row.desc,
        action: row.action,
        number: row.number.unwrap_or(Decimal::ZERO),
        price: row.price,
        price_currency: row.pricecur,
        var,
        var_currency: row.varcur,
        cash,
        cash_currency: row.cashcur,
        curr_rate,
        commission: row.commission.unwrap_or(Decimal::ZERO),
        order_id: row.order_id,
        category: row.category,
        unintended: row.unintended,
        isin_change: row.isin_change,
        insertion_order: row.idx,
    })
}

fn dedup_and_sort(trades: &mut Vec<Trade>) {
    let mut seen = std::collections::HashSet::new();
    trades.retain(|t| {
        let key = (
            t.value_date,
            t.isin.clone(),
            t.action,
            t.number,
            t.var,
            t.order_id.clone(),
            t.description.clone(),
        );
        seen.insert(key)
    });
    trades.sort_by(|a, b| a.value_date.cmp(&b.value_date).then(a.insertion_order.cmp(&b.insertion_order)));
}
