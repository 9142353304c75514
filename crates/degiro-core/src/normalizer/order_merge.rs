//! Stage (f): order merge.
//!
//! Collapses each group of intended same-side, same-order-id fills into one
//! record: summed `number`/`cash`/`var`, averaged `price`, and every other
//! column taken as the group's unique value — or, if the group turns out
//! not to be unique on that column, the first value, with a warning (the
//! spec documents this as a tie-break rather than a hard failure).

use super::WorkRow;
use crate::models::{Action, Warning};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub(super) fn merge_orders(rows: Vec<WorkRow>, warnings: &mut Vec<Warning>) -> Vec<WorkRow> {
    let mut buy_groups: HashMap<String, Vec<WorkRow>> = HashMap::new();
    let mut sell_groups: HashMap<String, Vec<WorkRow>> = HashMap::new();
    let mut passthrough = Vec::new();

    for row in rows {
        match (row.action, row.unintended) {
            (Action::Buy, false) => {
                let oid = row.order_id.clone().unwrap_or_default();
                buy_groups.entry(oid).or_default().push(row);
            }
            (Action::Sell, false) => {
                let oid = row.order_id.clone().unwrap_or_default();
                sell_groups.entry(oid).or_default().push(row);
            }
            _ => passthrough.push(row),
        }
    }

    let mut merged = passthrough;
    for (_, group) in buy_groups {
        merged.push(collapse_group(group, warnings));
    }
    for (_, group) in sell_groups {
        merged.push(collapse_group(group, warnings));
    }
    merged
}

fn collapse_group(mut group: Vec<WorkRow>, warnings: &mut Vec<Warning>) -> WorkRow {
    group.sort_by_key(|r| r.idx);
    if group.len() == 1 {
        return group
            .into_iter()
            .next()
            .unwrap_or_else(|| unreachable_empty_group());
    }

    let number: Decimal = group.iter().filter_map(|r| r.number).sum();
    let cash: Decimal = group.iter().filter_map(|r| r.cash).sum();
    let var: Decimal = group.iter().filter_map(|r| r.var).sum();
    let prices: Vec<Decimal> = group.iter().filter_map(|r| r.price).collect();
    let price = if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<Decimal>() / Decimal::from(prices.len()))
    };

    let group_idx = group[0].idx;
    check_unique(&group, group_idx, "isin", warnings, |r| r.isin.clone());
    check_unique(&group, group_idx, "product", warnings, |r| r.product.clone());
    check_unique(&group, group_idx, "value_date", warnings, |r| {
        r.value_date.map(|d| d.to_string()).unwrap_or_default()
    });
    check_unique(&group, group_idx, "varcur", warnings, |r| r.varcur.clone());
    check_unique(&group, group_idx, "cashcur", warnings, |r| r.cashcur.clone());

    let mut base = group.into_iter().next().unwrap_or_else(|| unreachable_empty_group());
    base.number = Some(number);
    base.cash = Some(cash);
    base.var = Some(var);
    base.price = price;
    base
}

fn check_unique<F: Fn(&WorkRow) -> String>(
    group: &[WorkRow],
    group_idx: usize,
    field_name: &str,
    warnings: &mut Vec<Warning>,
    extract: F,
) {
    let mut values = group.iter().map(&extract);
    let Some(first) = values.next() else { return };
    if values.any(|v| v != first) {
        warnings.push(Warning {
            row: Some(group_idx),
            message: format!(
                "order-merge group at row {group_idx} has non-unique `{field_name}`; took the first value"
            ),
        });
    }
}

/// A group is only ever built from a non-empty `Vec` pushed to by the
/// caller; this exists purely so the fallback path never needs `.expect()`.
fn unreachable_empty_group() -> WorkRow {
    WorkRow {
        idx: 0,
        had_reg_date: true,
        reg_date: None,
        reg_hour: None,
        value_date: None,
        timestamp: None,
        product: String::new(),
        isin: String::new(),
        desc: String::new(),
        curr_rate_raw: None,
        curr_rate: None,
        varcur: String::new(),
        var: None,
        cashcur: String::new(),
        cash: None,
        order_id: None,
        action: Action::None,
        number: None,
        price: None,
        pricecur: None,
        unintended: false,
        category: crate::models::Category::None,
        commission: None,
        isin_change: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn fill(idx: usize, order_id: &str, number: Decimal, price: Decimal, var: Decimal) -> WorkRow {
        WorkRow {
            idx,
            had_reg_date: true,
            reg_date: NaiveDate::from_ymd_opt(2023, 1, 4),
            reg_hour: None,
            value_date: NaiveDate::from_ymd_opt(2023, 1, 4),
            timestamp: None,
            product: "Acme".to_string(),
            isin: "IE00BD8PGZ49".to_string(),
            desc: String::new(),
            curr_rate_raw: None,
            curr_rate: None,
            varcur: "EUR".to_string(),
            var: Some(var),
            cashcur: "EUR".to_string(),
            cash: Some(var),
            order_id: Some(order_id.to_string()),
            action: Action::Buy,
            number: Some(number),
            price: Some(price),
            pricecur: Some("EUR".to_string()),
            unintended: false,
            category: crate::models::Category::None,
            commission: None,
            isin_change: None,
        }
    }

    #[test]
    fn collapses_multi_fill_order_summing_number_and_averaging_price() {
        let rows = vec![
            fill(0, "ORD1", dec!(5), dec!(10.0), dec!(-50.0)),
            fill(1, "ORD1", dec!(5), dec!(12.0), dec!(-60.0)),
        ];
        let mut warnings = Vec::new();
        let merged = merge_orders(rows, &mut warnings);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].number, Some(dec!(10)));
        assert_eq!(merged[0].price, Some(dec!(11.0)));
        assert_eq!(merged[0].var, Some(dec!(-110.0)));
    }

    #[test]
    fn leaves_single_fill_orders_untouched() {
        let rows = vec![fill(0, "ORD2", dec!(3), dec!(9.0), dec!(-27.0))];
        let mut warnings = Vec::new();
        let merged = merge_orders(rows, &mut warnings);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].number, Some(dec!(3)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn warns_on_non_unique_group_column_but_keeps_first_value() {
        let mut second = fill(1, "ORD3", dec!(5), dec!(12.0), dec!(-60.0));
        second.product = "Different Name".to_string();
        let rows = vec![fill(0, "ORD3", dec!(5), dec!(10.0), dec!(-50.0)), second];
        let mut warnings = Vec::new();
        let merged = merge_orders(rows, &mut warnings);
        assert_eq!(merged[0].product, "Acme");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("product"));
    }
}
