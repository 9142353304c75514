//! `degiro-core`: ingests a DEGIRO brokerage CSV export and computes
//! realized capital-gains returns per ISIN under Spanish tax rules (FIFO
//! lot matching plus the two-month loss-suppression rule).
//!
//! The pipeline has four stages, each its own module:
//! [`csv_reader`] (raw ingest) → [`normalizer`] (canonical `Trade` table) →
//! [`matcher`] (per-ISIN FIFO) → [`aggregator`] (summary). [`compute_returns`]
//! wires them together; it is the crate's only public entry point besides
//! the individual stage modules, kept public for callers who need to
//! intervene between stages (the CLI does not).

pub mod aggregator;
pub mod config;
pub mod csv_reader;
pub mod error;
pub mod locale;
pub mod matcher;
pub mod models;
pub mod normalizer;

use config::Config;
use error::Result;
use models::Summary;
use std::path::Path;

/// Run the full pipeline: read `csv_path`, normalize, match, aggregate.
///
/// `start_date`/`end_date` are `dd/mm/YYYY` strings bounding which *closing*
/// trades count toward the return (exclusive of both endpoints); `None`
/// leaves that side of the window open. An empty input CSV is not an error:
/// it yields [`Summary::empty`].
pub fn compute_returns(csv_path: &Path, start_date: Option<&str>, end_date: Option<&str>) -> Result<Summary> {
    let config = Config::load_with_overrides();

    let raw_rows = csv_reader::read_raw_rows(csv_path)?;
    if raw_rows.is_empty() {
        return Ok(Summary::empty());
    }

    let normalized = normalizer::normalize(raw_rows, &config)?;

    let start = start_date.and_then(locale::parse_date);
    let end = end_date.and_then(locale::parse_date);

    let matches = matcher::match_all(&normalized.trades, &normalized.isin_change_pairs, start, end, &config)?;

    Ok(aggregator::aggregate(matches, normalized.warnings))
}
