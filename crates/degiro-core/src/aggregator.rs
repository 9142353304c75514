//! Aggregator: collapses per-ISIN Lot Matcher results into the boundary's
//! `Summary` shape, ordered by descending absolute return so the biggest
//! movers lead the output (not an observable contract, just a reading
//! convenience).

use crate::matcher::IsinMatch;
use crate::models::{IsinSummary, Summary, Warning};
use rust_decimal::Decimal;

pub fn aggregate(matches: Vec<IsinMatch>, warnings: Vec<Warning>) -> Summary {
    let global_return: Decimal = matches.iter().map(|m| m.total_return).sum();

    let mut isin_summary: Vec<IsinSummary> = matches
        .into_iter()
        .map(|m| IsinSummary {
            isin: m.isin,
            product: m.product,
            total_return: m.total_return,
        })
        .collect();
    isin_summary.sort_by(|a, b| b.total_return.abs().cmp(&a.total_return.abs()));

    Summary { isin_summary, global_return, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn one(isin: &str, total_return: Decimal) -> IsinMatch {
        IsinMatch { isin: isin.to_string(), product: "Acme".to_string(), total_return }
    }

    #[test]
    fn global_return_is_sum_of_per_isin_returns() {
        let summary = aggregate(vec![one("A", dec!(10.0)), one("B", dec!(-3.5))], Vec::new());
        assert_eq!(summary.global_return, dec!(6.5));
    }

    #[test]
    fn orders_by_descending_absolute_return() {
        let summary = aggregate(vec![one("A", dec!(5.0)), one("B", dec!(-50.0)), one("C", dec!(20.0))], Vec::new());
        let isins: Vec<&str> = summary.isin_summary.iter().map(|s| s.isin.as_str()).collect();
        assert_eq!(isins, vec!["B", "C", "A"]);
    }

    #[test]
    fn empty_matches_yield_zero_global_return() {
        let summary = aggregate(Vec::new(), Vec::new());
        assert_eq!(summary.global_return, Decimal::ZERO);
        assert!(summary.isin_summary.is_empty());
    }
}
