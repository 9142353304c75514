//! Stage (h): categorization.

use super::WorkRow;
use crate::config::Config;
use crate::models::{Action, Category};

pub(super) fn categorize(mut row: WorkRow, config: &Config) -> WorkRow {
    row.category = if config.option_month_tokens.iter().any(|tok| row.desc.contains(tok.as_str())) {
        Category::Option
    } else if row.action == Action::Buy || row.action == Action::Sell {
        Category::Stock
    } else if row.desc == "Dividendo" {
        Category::Dividend
    } else {
        Category::None
    };
    row
}
