//! Stage (d): orphan-row merge.
//!
//! A row whose `reg_date` is null is the tail of the previous row: its
//! non-empty string fields are appended to the mother row, then the orphan
//! is dropped. Implemented as a single forward pass rather than the
//! index-remap/left-join this re-architects from.

use super::WorkRow;
use crate::error::{DegiroError, Result};

pub(super) fn merge_orphans(rows: Vec<WorkRow>) -> Result<Vec<WorkRow>> {
    let mut merged: Vec<WorkRow> = Vec::with_capacity(rows.len());

    for row in rows {
        if row.had_reg_date {
            merged.push(row);
            continue;
        }

        let Some(mother) = merged.last_mut() else {
            return Err(DegiroError::OrphanWithoutMother { row: row.idx });
        };
        append_str(&mut mother.product, &row.product);
        append_str(&mut mother.isin, &row.isin);
        append_str(&mut mother.desc, &row.desc);
        append_str(&mut mother.varcur, &row.varcur);
        append_str(&mut mother.cashcur, &row.cashcur);
        if let Some(tail) = &row.order_id {
            let base = mother.order_id.get_or_insert_with(String::new);
            base.push_str(tail);
        }
        if let Some(tail) = &row.curr_rate_raw {
            let base = mother.curr_rate_raw.get_or_insert_with(String::new);
            base.push_str(tail);
        }
    }

    Ok(merged)
}

fn append_str(mother: &mut String, tail: &str) {
    if !tail.is_empty() {
        mother.push_str(tail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Category};
    use chrono::NaiveDate;

    fn row(idx: usize, had_reg_date: bool, desc: &str) -> WorkRow {
        WorkRow {
            idx,
            had_reg_date,
            reg_date: if had_reg_date { NaiveDate::from_ymd_opt(2023, 1, 4) } else { None },
            reg_hour: None,
            value_date: if had_reg_date { NaiveDate::from_ymd_opt(2023, 1, 4) } else { None },
            timestamp: None,
            product: String::new(),
            isin: String::new(),
            desc: desc.to_string(),
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
            category: Category::None,
            commission: None,
            isin_change: None,
        }
    }

    #[test]
    fn merges_orphan_tail_into_mother_desc() {
        let rows = vec![row(0, true, "Compra 10 @ 25,50 EU"), row(1, false, "R")];
        let merged = merge_orphans(rows).expect("merges");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].desc, "Compra 10 @ 25,50 EUR");
    }

    #[test]
    fn merges_chain_of_consecutive_orphans() {
        let rows = vec![
            row(0, true, "Compra 10 @ 25,5"),
            row(1, false, "0 "),
            row(2, false, "EUR"),
        ];
        let merged = merge_orphans(rows).expect("merges");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].desc, "Compra 10 @ 25,50 EUR");
    }

    #[test]
    fn leading_orphan_without_mother_is_fatal() {
        let rows = vec![row(0, false, "R")];
        let result = merge_orphans(rows);
        assert!(matches!(result, Err(DegiroError::OrphanWithoutMother { row: 0 })));
    }
}
