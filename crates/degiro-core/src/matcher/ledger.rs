//! The residual opposing-side lot book (`opp_df` in the spec prose),
//! re-architected as an explicit FIFO queue: lots are popped from the
//! front until the closing trade's effective shares are exhausted,
//! splitting the last lot if it is only partially consumed.

use crate::models::Action;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub(super) struct Lot {
    pub value_date: NaiveDate,
    pub insertion_order: usize,
    pub sign: Action,
    pub number_remaining: Decimal,
    pub number_orig: Decimal,
    pub var: Decimal,
    pub commission: Decimal,
    pub curr_rate: Decimal,
}

/// A fraction of a lot consumed by a single closing trade.
pub(super) struct ConsumedFragment {
    pub var: Decimal,
    pub commission: Decimal,
    pub curr_rate: Decimal,
    pub number_orig: Decimal,
    pub shares_effective_lot: Decimal,
}

#[derive(Debug, Default)]
pub(super) struct ResidualBook {
    lots: VecDeque<Lot>,
}

impl ResidualBook {
    pub fn new() -> Self {
        Self { lots: VecDeque::new() }
    }

    /// Seed lots carried over from a predecessor ISIN (a `CAMBIO DE ISIN`
    /// admission). They predate everything else in this book, so they go
    /// at the front, oldest first.
    pub fn seed_front(&mut self, mut lots: Vec<Lot>) {
        lots.sort_by(|a, b| a.value_date.cmp(&b.value_date).then(a.insertion_order.cmp(&b.insertion_order)));
        for lot in lots.into_iter().rev() {
            self.lots.push_front(lot);
        }
    }

    pub fn sign(&self) -> Option<Action> {
        self.lots.front().map(|l| l.sign)
    }

    pub fn total_remaining(&self) -> Decimal {
        self.lots.iter().map(|l| l.number_remaining).sum()
    }

    pub fn push_lot(&mut self, lot: Lot) {
        self.lots.push_back(lot);
    }

    /// Consume up to `amount` shares FIFO from the front of the queue,
    /// returning the fragments actually consumed (may be less than
    /// `amount` if the book runs dry).
    pub fn consume(&mut self, amount: Decimal) -> Vec<ConsumedFragment> {
        let mut remaining = amount;
        let mut fragments = Vec::new();

        while remaining > Decimal::ZERO {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            let take = remaining.min(front.number_remaining);
            if take <= Decimal::ZERO {
                break;
            }
            fragments.push(ConsumedFragment {
                var: front.var,
                commission: front.commission,
                curr_rate: front.curr_rate,
                number_orig: front.number_orig,
                shares_effective_lot: take,
            });
            front.number_remaining -= take;
            remaining -= take;
            if front.number_remaining <= Decimal::ZERO {
                self.lots.pop_front();
            }
        }

        fragments
    }

    pub fn into_leftover(self) -> Vec<Lot> {
        self.lots.into_iter().collect()
    }
}
