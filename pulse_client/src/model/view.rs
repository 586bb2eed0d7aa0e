//! Render-facing models: what the presentation layer reads.
use crate::model::status::ConnectionStatus;
use crate::model::stock::PriceMovement;

/// One row of the ordered view.
#[derive(Debug, Clone, PartialEq)]
pub struct StockView {
    /// Symbol identifier.
    pub symbol: String,
    /// Display name from the catalog, or the symbol when unknown.
    pub company_name: String,
    /// Price formatted with a dollar sign and two decimals, e.g. `$174.55`.
    pub price: String,
    /// Raw price behind `price`.
    pub price_value: f64,
    /// Absolute change against the previous price.
    pub price_change: f64,
    /// Relative change in percent.
    pub price_change_percent: f64,
    /// Direction of the change.
    pub movement: PriceMovement,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerState {
    /// Known stocks, highest price first.
    pub stocks: Vec<StockView>,
    /// Latest transport status seen by the tracker.
    pub connection_status: ConnectionStatus,
    /// A start or stop is in flight.
    pub is_loading: bool,
    /// Last error message, cleared by the next start.
    pub error: Option<String>,
}

impl TrackerState {
    /// Start may be offered: disconnected and idle.
    pub fn start_enabled(&self) -> bool {
        self.connection_status.is_disconnected() && !self.is_loading
    }

    /// Stop may be offered: connected and idle.
    pub fn stop_enabled(&self) -> bool {
        self.connection_status.is_connected() && !self.is_loading
    }
}

/// One-shot banner for the presentation layer; consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Something the user asked for worked.
    Success(String),
    /// Neutral information.
    Info(String),
    /// Something failed.
    Error(String),
}
