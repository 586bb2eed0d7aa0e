//! Price update payload exchanged over the round-trip channel.
//!
//! A `PriceSnapshot` is one observation for one symbol. On the wire it is a
//! single JSON object per text frame, terminated by a newline:
//!
//! ```text
//! {"symbol":"AAPL","price":176.1,"previousPrice":175.5,"timestamp":1700000000000}
//! ```
//!
//! Unknown fields are ignored when decoding so newer peers can add data.
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::PulseError;

/// Frame terminator for the line-oriented text transport.
pub const FRAME_DELIMITER: u8 = b'\n';

/// One price observation for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshot {
    /// Symbol identifier (e.g. `AAPL`).
    pub symbol: String,
    /// Price observed at `timestamp`.
    pub price: f64,
    /// Price of the previous observation for the same symbol.
    pub previous_price: f64,
    /// UTC timestamp in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl PriceSnapshot {
    /// Build a snapshot stamped with the current UTC time.
    pub fn now(symbol: impl Into<String>, price: f64, previous_price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            previous_price,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Encode the snapshot as one newline-terminated text frame.
    pub fn to_frame(&self) -> Result<Vec<u8>, PulseError> {
        let mut frame = serde_json::to_vec(self)?;
        frame.push(FRAME_DELIMITER);
        Ok(frame)
    }

    /// Decode a text frame; surrounding whitespace and the delimiter are ignored.
    pub fn from_frame(frame: &str) -> Result<Self, PulseError> {
        Ok(serde_json::from_str(frame.trim())?)
    }

    /// Decode raw frame bytes, rejecting anything that is not UTF-8 text.
    pub fn from_frame_bytes(bytes: &[u8]) -> Result<Self, PulseError> {
        let text = String::from_utf8(bytes.to_vec())?;
        Self::from_frame(&text)
    }
}
