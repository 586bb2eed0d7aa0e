//! Conversions between transport messages, domain aggregates and view rows.
use pulse_common::PriceSnapshot;
use pulse_common::tickers::company_name;

use crate::model::stock::Stock;
use crate::model::view::StockView;

/// Transport snapshot to domain aggregate; movement is derived from the prices.
pub fn to_domain(snapshot: &PriceSnapshot) -> Stock {
    Stock::new(snapshot.symbol.clone(), snapshot.price, snapshot.previous_price)
}

/// Domain aggregate to a render-ready row.
pub fn to_ui(stock: &Stock) -> StockView {
    StockView {
        symbol: stock.symbol().to_string(),
        company_name: company_name(stock.symbol()),
        price: format_price(stock.current_price()),
        price_value: stock.current_price(),
        price_change: stock.price_change(),
        price_change_percent: stock.price_change_percent(),
        movement: stock.movement(),
    }
}

/// Map an ordered list, keeping its order.
pub fn to_ui_list(stocks: &[Stock]) -> Vec<StockView> {
    stocks.iter().map(to_ui).collect()
}

/// `$` prefix and exactly two decimals.
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stock::PriceMovement;

    fn snapshot(symbol: &str, price: f64, previous_price: f64) -> PriceSnapshot {
        PriceSnapshot {
            symbol: symbol.to_string(),
            price,
            previous_price,
            timestamp: 1,
        }
    }

    #[test]
    fn to_domain_copies_prices_and_derives_movement() {
        let up = to_domain(&snapshot("AAPL", 150.0, 145.0));
        assert_eq!(up.symbol(), "AAPL");
        assert_eq!(up.current_price(), 150.0);
        assert_eq!(up.previous_price(), 145.0);
        assert_eq!(up.movement(), PriceMovement::Up);

        assert_eq!(to_domain(&snapshot("GOOG", 140.0, 145.0)).movement(), PriceMovement::Down);
        assert_eq!(
            to_domain(&snapshot("MSFT", 0.0, 0.0)).movement(),
            PriceMovement::Unchanged
        );
    }

    #[test]
    fn to_ui_formats_price_and_keeps_metrics() {
        let view = to_ui(&Stock::new("AAPL", 174.554, 170.0));

        assert_eq!(view.symbol, "AAPL");
        assert_eq!(view.company_name, "Apple Inc.");
        assert_eq!(view.price, "$174.55");
        assert_eq!(view.price_value, 174.554);
        assert!((view.price_change - 4.554).abs() < 1e-9);
        assert!((view.price_change_percent - (4.554 / 170.0) * 100.0).abs() < 1e-9);
        assert_eq!(view.movement, PriceMovement::Up);
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_price(100.0), "$100.00");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(12.5), "$12.50");
        assert_eq!(format_price(-3.456), "$-3.46");
    }

    #[test]
    fn to_ui_list_preserves_order() {
        let stocks = vec![Stock::new("MSFT", 300.0, 300.0), Stock::new("IBM", 10.0, 12.0)];
        let views = to_ui_list(&stocks);

        assert_eq!(views.len(), 2);
        assert_eq!(views[0].company_name, "Microsoft Corp.");
        assert_eq!(views[1].company_name, "IBM");
        assert_eq!(views[1].movement, PriceMovement::Down);
        assert!(to_ui_list(&[]).is_empty());
    }
}
