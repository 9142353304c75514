//! Core data types: the raw CSV row, the canonical `Trade`, and the
//! boundary-facing `Summary`.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One line of the brokerage export before normalization. Columns are bound
/// by position, not by header label (labels are localized and may drift).
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub reg_date: Option<String>,
    pub reg_hour: Option<String>,
    pub value_date: Option<String>,
    pub product: Option<String>,
    pub isin: Option<String>,
    pub desc: Option<String>,
    pub curr_rate: Option<String>,
    pub varcur: Option<String>,
    pub var: Option<String>,
    pub cashcur: Option<String>,
    pub cash: Option<String>,
    pub id_order: Option<String>,
}

/// Side of a fill. `None` means the description did not encode a trade
/// (dividends, informational rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    None,
}

impl Action {
    pub fn opposite(self) -> Action {
        match self {
            Action::Buy => Action::Sell,
            Action::Sell => Action::Buy,
            Action::None => Action::None,
        }
    }
}

/// What kind of instrument/event a row represents. Only `Stock` rows
/// participate in return computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Stock,
    Option,
    Dividend,
    None,
}

/// Canonical transaction produced by the Normalizer. Immutable once built;
/// the Lot Matcher derives short-lived per-ISIN lots from these but never
/// mutates a `Trade` itself.
#[derive(Debug, Clone)]
pub struct Trade {
    pub timestamp: NaiveDateTime,
    pub value_date: NaiveDate,
    pub product: String,
    pub isin: String,
    pub description: String,
    pub action: Action,
    pub number: Decimal,
    pub price: Option<Decimal>,
    pub price_currency: Option<String>,
    pub var: Decimal,
    pub var_currency: String,
    pub cash: Decimal,
    pub cash_currency: String,
    pub curr_rate: Decimal,
    pub commission: Decimal,
    pub order_id: Option<String>,
    pub category: Category,
    pub unintended: bool,
    pub isin_change: Option<String>,
    /// Original CSV row order, used to break same-`value_date` ties.
    pub insertion_order: usize,
}

/// Per-ISIN realized return, as emitted by the Aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IsinSummary {
    pub isin: String,
    pub product: String,
    pub total_return: Decimal,
}

/// A non-fatal diagnostic surfaced alongside the `Summary` rather than
/// logged and discarded (see the error-handling design's "no silent
/// swallowing" rule).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Warning {
    pub row: Option<usize>,
    pub message: String,
}

/// The boundary's single output shape:
/// `compute_returns(csv_path, start_date, end_date) -> Summary`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub isin_summary: Vec<IsinSummary>,
    pub global_return: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl Summary {
    pub fn empty() -> Self {
        Self {
            isin_summary: Vec::new(),
            global_return: Decimal::ZERO,
            warnings: Vec::new(),
        }
    }
}
