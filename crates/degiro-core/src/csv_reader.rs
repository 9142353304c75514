//! CSV Reader & Column Binder (§4.1).
//!
//! Column *positions* are fixed; header *labels* are localized and may
//! drift, so binding never looks at the header text. Rows are flexible in
//! field count: an orphan row (a continuation fragment of the previous
//! row's description) typically carries fewer populated fields than a full
//! trade row.

use crate::error::{DegiroError, Result};
use crate::models::RawRow;
use std::path::Path;

const COLUMN_COUNT: usize = 12;

/// Read the brokerage export and bind each record's columns positionally.
pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(DegiroError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(bind_row(&record));
    }
    Ok(rows)
}

fn field(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record.get(idx).and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn bind_row(record: &csv::StringRecord) -> RawRow {
    debug_assert!(COLUMN_COUNT == 12);
    RawRow {
        reg_date: field(record, 0),
        reg_hour: field(record, 1),
        value_date: field(record, 2),
        product: field(record, 3),
        isin: field(record, 4),
        desc: field(record, 5),
        curr_rate: field(record, 6),
        varcur: field(record, 7),
        var: field(record, 8),
        cashcur: field(record, 9),
        cash: field(record, 10),
        id_order: field(record, 11),
    }
}
