//! Simulated live stock price feed.
//!
//! The pieces, from the wire up:
//! - [`generator`] produces random-walk snapshots for the symbol catalog,
//! - [`session`] owns one TCP connection, sends generated snapshots and
//!   decodes whatever comes back,
//! - [`relay`] buffers decoded snapshots between the session and its consumer,
//! - [`mapper`] converts snapshots into domain and display models,
//! - [`tracker`] merges updates into the ordered view and drives start/stop.
#![warn(missing_docs)]
pub mod args;
pub mod broadcast;
pub mod generator;
pub mod mapper;
pub mod model;
pub mod relay;
pub mod session;
pub mod tracker;

pub use model::status::ConnectionStatus;
pub use model::view::{Notification, StockView, TrackerState};
pub use session::{PriceSession, SessionConfig, TcpSession};
pub use tracker::PriceTracker;
