//! Error types shared between the echo server and the price client.
//!
//! The `PulseError` enum unifies the failure cases of the workspace: socket I/O,
//! frame (de)serialization, connection failures, and lock poisoning, so every
//! crate can propagate a single error type with `?`.
use std::io;
use std::string::FromUtf8Error;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by server and client.
#[derive(Error, Debug)]
pub enum PulseError {
    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// UTF-8 conversion error when a frame is not valid text.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// Failure while encoding/decoding a JSON frame via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A `host:port` string did not resolve to any socket address.
    #[error("Address resolution failed: {0}")]
    Address(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// A symbol is not part of the catalog.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}

impl<T> From<PoisonError<T>> for PulseError {
    fn from(err: PoisonError<T>) -> Self {
        PulseError::MutexLock(err.to_string())
    }
}
