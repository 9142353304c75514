//! Error taxonomy for the ingest, normalization, and matching pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DegiroError {
    #[error("input file not found: {0}")]
    FileNotFound(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at row {row}: {message}")]
    ParseError { row: usize, message: String },

    #[error("orphan row at index {row} has no preceding mother row")]
    OrphanWithoutMother { row: usize },

    #[error("missing FX rate for order {order_id} (currency {currency})")]
    FxMissing { order_id: String, currency: String },

    #[error(
        "ISIN change mismatch: sold {shares_sold} shares of {isin_new} but only {shares_available} available across {isin_new} and {isin_old}"
    )]
    IsinChangeMismatch {
        isin_new: String,
        isin_old: String,
        shares_sold: String,
        shares_available: String,
    },
}

pub type Result<T> = std::result::Result<T, DegiroError>;
