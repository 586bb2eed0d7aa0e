//! Shared networking constants and helpers used by the echo server and client.
use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::PulseError;

/// TCP port the echo server listens on.
pub const ECHO_PORT: u16 = 8080;
/// Cadence of the price generator, in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 2000;
/// Upper bound for establishing the transport, in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
/// Upper bound for a single blocked write, in milliseconds.
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5000;

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// Resolve a `host:port` string to the first matching socket address.
pub fn resolve(address: &str) -> Result<SocketAddr, PulseError> {
    address
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| PulseError::Address(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ip_and_port() {
        assert_eq!(addr("127.0.0.1", ECHO_PORT), "127.0.0.1:8080");
    }

    #[test]
    fn resolves_literal_addresses() {
        let resolved = resolve("127.0.0.1:9000").unwrap();
        assert_eq!(resolved.port(), 9000);
        assert!(resolved.ip().is_loopback());
    }

    #[test]
    fn rejects_addresses_without_port() {
        assert!(resolve("127.0.0.1").is_err());
    }
}
