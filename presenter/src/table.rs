//! Portfolio table computation.

use portfolio::{Portfolio, QuoteMap};

use crate::display::PortfolioRow;
use crate::error::TableError;

pub const TOTAL_ROW_LABEL: &str = "Total Portfolio Value:";

/// Fixed 4-decimal display format.
pub fn format_value(value: f64) -> String {
    format!("{value:.4}")
}

/// Build the display rows: one per entry in portfolio order, followed by
/// the total row.
///
/// Every entry needs a quote; a missing one rejects the whole table so a
/// partial total is never shown.
pub fn build_rows(portfolio: &Portfolio, quotes: &QuoteMap) -> Result<Vec<PortfolioRow>, TableError> {
    let mut rows = Vec::with_capacity(portfolio.len() + 1);
    let mut total_value = 0.0;

    for entry in portfolio.entries() {
        let quote = quotes
            .get(&entry.asset_id)
            .ok_or_else(|| TableError::MissingQuote {
                asset: entry.asset_id.clone(),
            })?;

        let value = entry.amount * quote.price;
        total_value += value;

        rows.push(PortfolioRow {
            asset_name: entry.asset_id.clone(),
            asset_amount: format_value(entry.amount),
            asset_price: format_value(quote.price),
            asset_value: format_value(value),
            value_change: format_value(quote.change),
            percent_change: format_value(quote.percent_change * 100.0),
        });
    }

    rows.push(PortfolioRow {
        asset_name: TOTAL_ROW_LABEL.to_string(),
        asset_value: format_value(total_value),
        ..PortfolioRow::default()
    });

    Ok(rows)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use portfolio::{PortfolioEntry, Quote};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]
        #[test]
        fn table_invariants(
            holdings in prop::collection::vec((0.0..1_000.0f64, 0.0..100_000.0f64), 0..12)
        ) {
            let entries: Vec<PortfolioEntry> = holdings
                .iter()
                .enumerate()
                .map(|(i, (amount, _))| PortfolioEntry::new(format!("A{i}"), *amount))
                .collect();
            let quotes: QuoteMap = holdings
                .iter()
                .enumerate()
                .map(|(i, (_, price))| (format!("A{i}"), Quote::new(*price, 0.0, 0.0)))
                .collect();
            let portfolio = Portfolio::new(entries).unwrap();

            let rows = build_rows(&portfolio, &quotes).unwrap();

            // --- INVARIANT 1: one row per entry plus the total, total last ---
            prop_assert_eq!(rows.len(), holdings.len() + 1);
            prop_assert_eq!(rows.last().unwrap().asset_name.as_str(), TOTAL_ROW_LABEL);

            // --- INVARIANT 2: entry order is preserved ---
            for (i, row) in rows.iter().take(holdings.len()).enumerate() {
                prop_assert_eq!(row.asset_name.clone(), format!("A{i}"));
            }

            // --- INVARIANT 3: total is the sum of the unrounded values ---
            let expected = holdings.iter().fold(0.0, |acc, (a, p)| acc + a * p);
            prop_assert_eq!(rows.last().unwrap().asset_value.clone(), format_value(expected));
        }
    }
}
