//! Command-line arguments for the echo server.
use clap::Parser;
use pulse_common::net::ECHO_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Local IP address to bind.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_ip: String,

    /// TCP port to listen on.
    #[clap(long, default_value_t = ECHO_PORT)]
    pub port: u16,
}
