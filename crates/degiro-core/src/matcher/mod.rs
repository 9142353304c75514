//! Lot Matcher: per-ISIN FIFO matching of the canonical trade table.
//!
//! Re-architected from a chained dataframe query into an explicit FIFO
//! queue of lots (see `ledger`): each trade either extends the current
//! position (same side as the book) or closes part/all of it (opposite
//! side), popping lots from the front of the queue oldest-first. Because
//! the book's live state already reflects every trade processed so far in
//! ascending `(value_date, insertion_order)` order, a same-day cascade of
//! closing trades naturally sees a shrinking pool without any separate
//! day-grouped "net position before" bookkeeping.

mod ledger;
mod two_month_rule;

use crate::config::Config;
use crate::error::{DegiroError, Result};
use crate::models::{Action, Category, Trade};
use chrono::NaiveDate;
use ledger::{Lot, ResidualBook};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Per-ISIN realized return, before aggregation.
#[derive(Debug, Clone)]
pub struct IsinMatch {
    pub isin: String,
    pub product: String,
    pub total_return: Decimal,
}

/// Run the Lot Matcher over every stock-category trade, grouped by ISIN.
///
/// `isin_change_pairs` maps a new ISIN to the old ISIN it superseded (from
/// the Normalizer's stage (i)); ISINs on the old side of a pair are matched
/// first so their leftover lots can seed the new ISIN's book.
pub fn match_all(
    trades: &[Trade],
    isin_change_pairs: &HashMap<String, String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    config: &Config,
) -> Result<Vec<IsinMatch>> {
    // Unintended rows (the `CAMBIO DE ISIN` pair itself) carry no real cash
    // flow and exist only to establish the `isin_change` linkage in the
    // Normalizer; running them through FIFO matching would realize a
    // phantom gain/loss on what is a non-taxable bookkeeping event. Their
    // old-side lots still reach the successor ISIN via the leftover seed.
    let mut by_isin: HashMap<String, Vec<&Trade>> = HashMap::new();
    for t in trades.iter().filter(|t| t.category == Category::Stock && !t.unintended) {
        by_isin.entry(t.isin.clone()).or_default().push(t);
    }
    for group in by_isin.values_mut() {
        group.sort_by(|a, b| a.value_date.cmp(&b.value_date).then(a.insertion_order.cmp(&b.insertion_order)));
    }

    let order = topological_order(&by_isin, isin_change_pairs);

    let mut leftover_by_isin: HashMap<String, Vec<Lot>> = HashMap::new();
    let mut results = Vec::new();

    for isin in order {
        let Some(isin_trades) = by_isin.get(&isin) else { continue };
        let seed = isin_change_pairs
            .get(&isin)
            .and_then(|old| leftover_by_isin.get(old))
            .cloned()
            .unwrap_or_default();

        let (total_return, leftover) = process_isin(isin_trades, seed, start_date, end_date, config)?;
        let product = isin_trades.last().map(|t| t.product.clone()).unwrap_or_default();
        results.push(IsinMatch { isin: isin.clone(), product, total_return });
        leftover_by_isin.insert(isin, leftover);
    }

    Ok(results)
}

fn topological_order(by_isin: &HashMap<String, Vec<&Trade>>, pairs: &HashMap<String, String>) -> Vec<String> {
    let mut isins: Vec<&String> = by_isin.keys().collect();
    isins.sort();

    let mut placed = HashSet::new();
    let mut order = Vec::new();
    for isin in isins {
        visit(isin, by_isin, pairs, &mut placed, &mut order);
    }
    order
}

fn visit(
    isin: &str,
    by_isin: &HashMap<String, Vec<&Trade>>,
    pairs: &HashMap<String, String>,
    placed: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !placed.insert(isin.to_string()) {
        return;
    }
    if let Some(old) = pairs.get(isin)
        && by_isin.contains_key(old)
    {
        visit(old, by_isin, pairs, placed, order);
    }
    order.push(isin.to_string());
}

/// Run the FIFO pass for a single ISIN, returning its total realized EUR
/// return plus whatever lots were left open at the end (surfaced so a
/// successor ISIN in a `CAMBIO DE ISIN` chain can seed from them).
fn process_isin(
    trades: &[&Trade],
    seed: Vec<Lot>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    config: &Config,
) -> Result<(Decimal, Vec<Lot>)> {
    let mut book = ResidualBook::new();
    book.seed_front(seed);

    let mut return_stock = Decimal::ZERO;

    for (insertion_order, t) in trades.iter().enumerate() {
        if t.action == Action::None {
            continue;
        }

        let closing = match book.sign() {
            None => false,
            Some(sign) => sign == t.action.opposite(),
        };

        if !closing {
            book.push_lot(Lot {
                value_date: t.value_date,
                insertion_order,
                sign: t.action,
                number_remaining: t.number,
                number_orig: t.number,
                var: t.var,
                commission: t.commission,
                curr_rate: t.curr_rate,
            });
            continue;
        }

        let shares_effective = t.number.min(book.total_remaining());
        let fragments = book.consume(shares_effective);

        if t.isin_change.is_some() && shares_effective < t.number {
            return Err(DegiroError::IsinChangeMismatch {
                isin_new: t.isin.clone(),
                isin_old: t.isin_change.clone().unwrap_or_default(),
                shares_sold: t.number.to_string(),
                shares_available: shares_effective.to_string(),
            });
        }

        let remainder = t.number - shares_effective;
        if remainder > Decimal::ZERO {
            book.push_lot(Lot {
                value_date: t.value_date,
                insertion_order,
                sign: t.action,
                number_remaining: remainder,
                number_orig: remainder,
                var: t.var,
                commission: t.commission,
                curr_rate: t.curr_rate,
            });
        }

        let in_window = within_window(t.value_date, start_date, end_date);
        if in_window {
            let row_res = (t.var + t.commission) * t.curr_rate;
            let opp_res: Decimal = fragments
                .iter()
                .map(|f| (f.var + f.commission) * f.curr_rate * f.shares_effective_lot / f.number_orig)
                .sum();
            let mut contribution = row_res + opp_res;

            if contribution < Decimal::ZERO && two_month_rule::is_loss_suppressed(trades, t, config.two_month_window_days) {
                contribution = Decimal::ZERO;
            }

            return_stock += contribution;
        }
    }

    Ok((return_stock, book.into_leftover()))
}

fn within_window(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start
        && date <= start
    {
        return false;
    }
    if let Some(end) = end
        && date >= end
    {
        return false;
    }
    true
}
