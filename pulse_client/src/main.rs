//! Price client: a terminal view of the simulated feed.
//!
//! Connects to the echo server, streams generated prices through it and
//! periodically prints the top of the ordered view. Ctrl+C stops the feed and
//! exits.
//!
//! Usage example (CLI):
//! ```bash
//! pulse_client --server-ip 127.0.0.1 --port 8080 --interval-ms 1000 --rows 10
//! ```
use clap::Parser;
use crossbeam_channel::{bounded, select, tick};
use log::{error, info, warn};
use pulse_client::args::Args;
use pulse_client::{Notification, PriceTracker, TcpSession, TrackerState};
use pulse_common::Result;
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for the feed to report a stop before exiting anyway.
const STOP_GRACE: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let config = args.session_config();
    info!("Price client targeting {}", config.server_addr);

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Ctrl+C received. Stopping price feed...");
        let _ = shutdown_tx.try_send(());
    }) {
        warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let session = Arc::new(TcpSession::new(config.clone()));
    let tracker = PriceTracker::new(session);
    let notifications = tracker.notifications();
    let refresh = tick(config.update_interval);

    tracker.start();
    loop {
        select! {
            recv(notifications) -> note => match note {
                Ok(Notification::Success(msg)) | Ok(Notification::Info(msg)) => info!("{}", msg),
                Ok(Notification::Error(msg)) => error!("{}", msg),
                Err(_) => break,
            },
            recv(refresh) -> _ => render(&tracker.state(), args.rows),
            recv(shutdown_rx) -> _ => break,
        }
    }

    let states = tracker.subscribe();
    tracker.stop();
    while let Ok(state) = states.recv_timeout(STOP_GRACE) {
        if state.connection_status.is_disconnected() && !state.is_loading {
            break;
        }
    }
    for note in notifications.try_iter() {
        info!("{:?}", note);
    }
    Ok(())
}

fn render(state: &TrackerState, rows: usize) {
    if let Some(e) = &state.error {
        warn!("Last error: {}", e);
    }
    info!(
        "{} | {} stocks",
        state.connection_status,
        state.stocks.len()
    );
    for stock in state.stocks.iter().take(rows) {
        info!(
            "{:<5} {:<28} {:>10} {} {:+.2} ({:+.2}%)",
            stock.symbol,
            stock.company_name,
            stock.price,
            stock.movement.arrow(),
            stock.price_change,
            stock.price_change_percent
        );
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
