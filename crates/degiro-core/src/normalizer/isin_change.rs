//! Stage (i): ISIN-change linkage.
//!
//! A `CAMBIO DE ISIN` event is a pair of unintended fills on the same
//! `value_date`: a sell closing out the old ISIN and a buy opening the new
//! one. The two rows are each other's counterpart (`isin_change` points old
//! to new and new to old), and every later intended sell of the new ISIN
//! also gets `isin_change` set to the old ISIN so the Lot Matcher can admit
//! the old ISIN's leftover lots if the new ISIN's own buy lots run short.

use super::WorkRow;
use crate::models::Action;
use chrono::NaiveDate;
use std::collections::HashMap;

pub(super) fn link_isin_changes(mut rows: Vec<WorkRow>) -> (Vec<WorkRow>, HashMap<String, String>) {
    let mut groups: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        if row.unintended
            && row.desc.contains("CAMBIO DE ISIN")
            && let Some(value_date) = row.value_date
        {
            groups.entry(value_date).or_default().push(i);
        }
    }

    let mut pair_map: HashMap<String, String> = HashMap::new();
    let mut change_dates: HashMap<String, NaiveDate> = HashMap::new();

    for (date, idxs) in &groups {
        let new_idx = idxs.iter().find(|&&i| rows[i].action == Action::Buy).copied();
        let old_idx = idxs.iter().find(|&&i| rows[i].action == Action::Sell).copied();
        if let (Some(new_idx), Some(old_idx)) = (new_idx, old_idx) {
            let new_isin = rows[new_idx].isin.clone();
            let old_isin = rows[old_idx].isin.clone();
            // The pair rows themselves are each other's counterpart: this is
            // what makes the symmetric isin_change invariant hold for the
            // same-value_date, opposite-action pair, independent of whatever
            // later intended trade (if any) also gets linked below.
            rows[new_idx].isin_change = Some(old_isin.clone());
            rows[old_idx].isin_change = Some(new_isin.clone());
            change_dates.insert(new_isin.clone(), *date);
            pair_map.insert(new_isin, old_isin);
        }
    }

    for row in rows.iter_mut() {
        if row.action != Action::Sell || row.unintended {
            continue;
        }
        let Some(old_isin) = pair_map.get(&row.isin) else {
            continue;
        };
        let Some(change_date) = change_dates.get(&row.isin) else {
            continue;
        };
        if let Some(value_date) = row.value_date
            && value_date > *change_date
        {
            row.isin_change = Some(old_isin.clone());
        }
    }

    (rows, pair_map)
}
