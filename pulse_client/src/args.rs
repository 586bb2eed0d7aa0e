//! Command-line arguments for the price client.
use clap::Parser;
use pulse_common::net::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_UPDATE_INTERVAL_MS, DEFAULT_WRITE_TIMEOUT_MS, ECHO_PORT,
};
use std::time::Duration;

use crate::session::SessionConfig;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Echo server IP address.
    #[clap(long, default_value = "127.0.0.1")]
    pub server_ip: String,

    /// Echo server TCP port.
    #[clap(long, default_value_t = ECHO_PORT)]
    pub port: u16,

    /// Milliseconds between generated price batches.
    #[clap(long, default_value_t = DEFAULT_UPDATE_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Connect timeout in milliseconds.
    #[clap(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_MS)]
    pub connect_timeout_ms: u64,

    /// Write timeout in milliseconds.
    #[clap(long, default_value_t = DEFAULT_WRITE_TIMEOUT_MS)]
    pub write_timeout_ms: u64,

    /// Number of rows of the ordered view to print.
    #[clap(long, default_value_t = 25)]
    pub rows: usize,
}

impl Args {
    /// Session settings described by these arguments.
    pub fn session_config(&self) -> SessionConfig {
        let server_ip = self.server_ip.trim().replace('"', "");
        SessionConfig::new(pulse_common::net::addr(&server_ip, self.port))
            .with_update_interval(Duration::from_millis(self.interval_ms))
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .with_write_timeout(Duration::from_millis(self.write_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_network_constants() {
        let args = Args::parse_from(["pulse_client"]);
        assert_eq!(args.server_ip, "127.0.0.1");
        assert_eq!(args.port, ECHO_PORT);
        assert_eq!(args.rows, 25);

        let config = args.session_config();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.update_interval, Duration::from_millis(2000));
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.write_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn overrides_flow_into_session_config() {
        let args = Args::parse_from([
            "pulse_client",
            "--server-ip",
            "\"10.0.0.5\"",
            "--port",
            "9000",
            "--interval-ms",
            "250",
            "--connect-timeout-ms",
            "100",
            "--write-timeout-ms",
            "300",
            "--rows",
            "5",
        ]);
        let config = args.session_config();

        assert_eq!(args.rows, 5);
        assert_eq!(config.server_addr, "10.0.0.5:9000");
        assert_eq!(config.update_interval, Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Duration::from_millis(100));
        assert_eq!(config.write_timeout, Duration::from_millis(300));
    }
}
