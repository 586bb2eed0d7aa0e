//! Domain model: the latest known price of one symbol.

/// Direction of the last price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMovement {
    /// `price > previous_price`
    Up,
    /// `price < previous_price`
    Down,
    /// Neither greater nor smaller.
    Unchanged,
}

impl PriceMovement {
    /// Classify the move from `previous_price` to `price`.
    pub fn between(price: f64, previous_price: f64) -> Self {
        if price > previous_price {
            PriceMovement::Up
        } else if price < previous_price {
            PriceMovement::Down
        } else {
            PriceMovement::Unchanged
        }
    }

    /// Single-character marker used by the terminal view.
    pub fn arrow(self) -> &'static str {
        match self {
            PriceMovement::Up => "▲",
            PriceMovement::Down => "▼",
            PriceMovement::Unchanged => "•",
        }
    }
}

/// Latest observation for a symbol plus derived change metrics.
///
/// Built only through [`Stock::new`], so `movement` always matches the two prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    symbol: String,
    current_price: f64,
    previous_price: f64,
    movement: PriceMovement,
}

impl Stock {
    /// Create an aggregate, deriving its movement from the prices.
    pub fn new(symbol: impl Into<String>, current_price: f64, previous_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            current_price,
            previous_price,
            movement: PriceMovement::between(current_price, previous_price),
        }
    }

    /// Symbol identifier.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Latest price.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Price before the latest observation.
    pub fn previous_price(&self) -> f64 {
        self.previous_price
    }

    /// Direction of the latest change.
    pub fn movement(&self) -> PriceMovement {
        self.movement
    }

    /// `current_price - previous_price`.
    pub fn price_change(&self) -> f64 {
        self.current_price - self.previous_price
    }

    /// Change relative to the previous price in percent; `0` when the previous
    /// price is zero.
    pub fn price_change_percent(&self) -> f64 {
        if self.previous_price != 0.0 {
            (self.price_change() / self.previous_price) * 100.0
        } else {
            0.0
        }
    }
}
