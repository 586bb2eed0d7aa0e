//!
//! Common types and utilities shared by the echo server and the price client.
//!
//! This crate aggregates:
//! - `error`: unified error type `PulseError` used across the workspace.
//! - `result`: handy `Result<T, PulseError>` alias.
//! - `tickers`: the fixed symbol catalog with base prices and company names.
//! - `snapshot`: the `PriceSnapshot` wire message and its text-frame codec.
//! - `net`: networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod result;
pub mod snapshot;
pub mod tickers;

pub use error::PulseError;
pub use result::Result;
pub use snapshot::PriceSnapshot;
pub use tickers::Ticker;
