//! Stage (g): commission & FX attachment.
//!
//! Fee legs and FX-rate donor legs share the same order id as the trade
//! they belong to but carry no side of their own (`action == None`). This
//! pass sums fee legs per order id into `commission`, takes the FX rate
//! from whichever donor row carries one, attaches both to the matching
//! trade row, and then discards the now-consumed donor rows.

use super::WorkRow;
use crate::error::Result;
use crate::locale::parse_rate_decimal;
use crate::models::Action;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub(super) fn attach_commission_and_fx(rows: Vec<WorkRow>) -> Result<Vec<WorkRow>> {
    let mut commission_by_order: HashMap<String, Decimal> = HashMap::new();
    let mut fx_by_order: HashMap<String, Decimal> = HashMap::new();

    for row in &rows {
        let Some(order_id) = row.order_id.as_ref() else {
            continue;
        };
        if row.action != Action::None {
            continue;
        }
        if !row.desc.contains("Divisa") {
            let entry = commission_by_order.entry(order_id.clone()).or_insert(Decimal::ZERO);
            *entry += row.var.unwrap_or(Decimal::ZERO);
        }
        if let Some(rate_str) = &row.curr_rate_raw
            && let Some(rate) = parse_rate_decimal(rate_str)
        {
            fx_by_order.entry(order_id.clone()).or_insert(rate);
        }
    }

    let rows: Vec<WorkRow> = rows
        .into_iter()
        .filter(|row| !(row.order_id.is_some() && row.action == Action::None))
        .map(|mut row| {
            if let Some(order_id) = row.order_id.clone() {
                if let Some(commission) = commission_by_order.get(&order_id) {
                    row.commission = Some(*commission);
                }
                if let Some(rate) = fx_by_order.get(&order_id) {
                    row.curr_rate = Some(*rate);
                } else if let Some(own_rate) = row.curr_rate_raw.as_deref().and_then(parse_rate_decimal) {
                    row.curr_rate = Some(own_rate);
                }
            }
            if row.cashcur == "EUR" {
                row.curr_rate = Some(Decimal::ONE);
            }
            row
        })
        .collect();

    Ok(rows)
}
