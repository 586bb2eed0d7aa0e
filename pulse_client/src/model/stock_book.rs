//! Per-symbol book of the latest aggregates and its ordered view.
//!
//! The book keeps symbols in first-seen order; overwriting a symbol keeps its
//! position. The ordered view is a stable sort of that order by price,
//! highest first, so equal prices stay in first-seen order.
use indexmap::IndexMap;

use crate::model::stock::Stock;

/// Latest aggregate per symbol, last write wins.
#[derive(Debug, Default, Clone)]
pub struct StockBook {
    stocks: IndexMap<String, Stock>,
}

impl StockBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the aggregate for `stock.symbol()`.
    pub fn merge(&mut self, stock: Stock) {
        self.stocks.insert(stock.symbol().to_string(), stock);
    }

    /// Latest aggregate for a symbol.
    #[cfg(test)]
    pub fn get(&self, symbol: &str) -> Option<&Stock> {
        self.stocks.get(symbol)
    }

    /// Number of symbols observed so far.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    /// `true` before the first merge.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Fresh list of every aggregate, sorted by current price descending.
    pub fn ordered(&self) -> Vec<Stock> {
        let mut ordered: Vec<Stock> = self.stocks.values().cloned().collect();
        sort_by_price_desc(&mut ordered);
        ordered
    }
}

/// Stable descending sort on current price. Uses the IEEE total order so a
/// stray NaN cannot break the comparator.
pub fn sort_by_price_desc(stocks: &mut [Stock]) {
    stocks.sort_by(|a, b| b.current_price().total_cmp(&a.current_price()));
}
