//! Price echo server.
//!
//! Listens on a TCP socket and reflects every newline-delimited text frame back to
//! the connection it came from. The price client uses it as the far end of its
//! round-trip transport: snapshots go out, the same snapshots come back.
//!
//! Usage example (CLI):
//! ```bash
//! pulse_server --bind-ip 0.0.0.0 --port 8080
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use pulse_common::Result;
use pulse_common::net::addr;
use pulse_server::EchoServer;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let server = EchoServer::bind(&addr(args.bind_ip.trim(), args.port))?;
    server.serve()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
