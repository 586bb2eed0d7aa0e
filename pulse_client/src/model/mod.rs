//! Data model types of the price pipeline.
//!
//! - `status`: transport `ConnectionStatus`.
//! - `stock`: domain aggregate `Stock` and `PriceMovement`.
//! - `stock_book`: the reducer's per-symbol book and ordered view.
//! - `view`: render-facing rows, tracker state and notifications.
pub mod status;
pub mod stock;
pub mod stock_book;
pub mod view;
