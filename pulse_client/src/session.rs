//! Transport session: one logical round-trip connection.
//!
//! [`PriceSession`] is the seam the tracker drives. [`TcpSession`] implements it
//! over a TCP connection to the echo server, one JSON text frame per line.
//!
//! While connected, two background threads run:
//! - the send loop pulls batches from a [`PriceGenerator`] and writes each
//!   snapshot while the session reports `Connected`;
//! - the receive loop reads echoed frames, pushes every decodable one into the
//!   [`UpdateRelay`] and skips the rest. When the channel closes or fails it
//!   publishes `Error` and tears the session down. It never reconnects.
//!
//! Status and the live connection are the only state shared between threads;
//! both sit behind a lock and are replaced whole. Writes go through their own
//! lock with a write timeout, so closing the channel never waits for a stalled
//! peer. Connect, disconnect and the receive loop's teardown are serialized,
//! and a receive loop only tears down the connection it was started for.

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use log::{debug, info, warn};
use pulse_common::net::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_UPDATE_INTERVAL_MS, DEFAULT_WRITE_TIMEOUT_MS, ECHO_PORT,
    addr, resolve,
};
use pulse_common::snapshot::FRAME_DELIMITER;
use pulse_common::{PriceSnapshot, Result};
use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::broadcast::Broadcast;
use crate::generator::PriceGenerator;
use crate::model::status::ConnectionStatus;
use crate::relay::UpdateRelay;

/// Lifecycle and data plane of a single transport session.
pub trait PriceSession: Send + Sync + 'static {
    /// Establish the channel. The returned stream is a best-effort log of this
    /// attempt (`Connecting`, then `Connected` or `Error`); only `Connected` if
    /// already connected. The authoritative status is [`Self::observe_status`].
    fn connect(&self) -> Receiver<ConnectionStatus>;

    /// Stop both loops, close the channel and end in `Disconnected`. Safe to
    /// call repeatedly or without a prior connect. Close errors are swallowed.
    fn disconnect(&self) -> Result<()>;

    /// Write one snapshot. Dropped silently unless connected.
    fn send(&self, snapshot: &PriceSnapshot);

    /// Decoded incoming snapshots. May be taken before any connection exists.
    fn observe_incoming(&self) -> Receiver<PriceSnapshot>;

    /// Current status followed by every transition.
    fn observe_status(&self) -> Receiver<ConnectionStatus>;

    /// A live channel exists and the status is `Connected`.
    fn is_connected(&self) -> bool;
}

/// Where to connect and how fast to generate.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Echo server `host:port`.
    pub server_addr: String,
    /// Generator cadence.
    pub update_interval: Duration,
    /// Upper bound for establishing the channel.
    pub connect_timeout: Duration,
    /// Upper bound for one blocked write. Must be non-zero.
    pub write_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_addr: addr("127.0.0.1", ECHO_PORT),
            update_interval: Duration::from_millis(DEFAULT_UPDATE_INTERVAL_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
        }
    }
}

impl SessionConfig {
    /// Default configuration pointed at `server_addr`.
    pub fn new(server_addr: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            ..Default::default()
        }
    }

    /// Set generator cadence
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set write timeout
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

/// Handles of one live connection.
struct Connection {
    id: u64,
    // Used only for shutdown, so closing never waits on a blocked write.
    control: TcpStream,
    writer: Arc<Mutex<TcpStream>>,
    cancelled: Arc<AtomicBool>,
    // Never sent on; dropping it wakes the send loop.
    _stop_tx: Sender<()>,
}

impl Connection {
    fn close(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Err(e) = self.control.shutdown(Shutdown::Both) {
            debug!("Ignoring close error: {}", e);
        }
    }
}

struct SessionInner {
    config: SessionConfig,
    status: Broadcast<ConnectionStatus>,
    // Serializes connect, disconnect and the receive loop's teardown.
    lifecycle: Mutex<()>,
    connection: Mutex<Option<Connection>>,
    next_id: AtomicU64,
    relay: UpdateRelay,
}

/// [`PriceSession`] over TCP.
pub struct TcpSession {
    inner: Arc<SessionInner>,
}

impl TcpSession {
    /// Disconnected session; nothing happens until [`PriceSession::connect`].
    pub fn new(config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                config,
                status: Broadcast::new(ConnectionStatus::Disconnected),
                lifecycle: Mutex::new(()),
                connection: Mutex::new(None),
                next_id: AtomicU64::new(0),
                relay: UpdateRelay::new(),
            }),
        }
    }

    /// Authoritative status right now.
    pub fn status(&self) -> ConnectionStatus {
        self.inner.status.current()
    }
}

impl PriceSession for TcpSession {
    fn connect(&self) -> Receiver<ConnectionStatus> {
        let (tx, rx) = unbounded();
        let _lifecycle = self.inner.lifecycle();
        if self.is_connected() {
            let _ = tx.send(ConnectionStatus::Connected);
            return rx;
        }

        // Leftovers of a connection that failed without a teardown.
        if let Err(e) = self.inner.release() {
            debug!("Ignoring stale session cleanup error: {}", e);
        }

        self.inner.status.publish(ConnectionStatus::Connecting);
        let _ = tx.send(ConnectionStatus::Connecting);

        let status = match open(&self.inner) {
            Ok(()) => ConnectionStatus::Connected,
            Err(e) => {
                warn!("Failed to connect to {}: {}", self.inner.config.server_addr, e);
                let status = ConnectionStatus::Error(e.to_string());
                self.inner.status.publish(status.clone());
                status
            }
        };
        let _ = tx.send(status);
        rx
    }

    fn disconnect(&self) -> Result<()> {
        let _lifecycle = self.inner.lifecycle();
        let released = self.inner.release();
        self.inner.status.publish(ConnectionStatus::Disconnected);
        info!("Session disconnected");
        released
    }

    fn send(&self, snapshot: &PriceSnapshot) {
        self.inner.send(snapshot);
    }

    fn observe_incoming(&self) -> Receiver<PriceSnapshot> {
        self.inner.relay.subscribe()
    }

    fn observe_status(&self) -> Receiver<ConnectionStatus> {
        self.inner.status.subscribe()
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}

impl Drop for TcpSession {
    fn drop(&mut self) {
        let _ = self.inner.release();
    }
}

impl SessionInner {
    fn lifecycle(&self) -> MutexGuard<'_, ()> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_connected(&self) -> bool {
        let has_connection = self
            .connection
            .lock()
            .map(|connection| connection.is_some())
            .unwrap_or(false);
        has_connection && self.status.current().is_connected()
    }

    /// `true` while connection `id` is the installed one.
    fn owns(&self, id: u64) -> bool {
        self.connection
            .lock()
            .map(|connection| connection.as_ref().is_some_and(|c| c.id == id))
            .unwrap_or(false)
    }

    fn send(&self, snapshot: &PriceSnapshot) {
        if !self.is_connected() {
            debug!("Not connected, dropping update for {}", snapshot.symbol);
            return;
        }

        let frame = match snapshot.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode update for {}: {}", snapshot.symbol, e);
                return;
            }
        };

        let (id, writer) = match self.connection.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(connection) => (connection.id, Arc::clone(&connection.writer)),
                None => return,
            },
            Err(e) => {
                debug!("Connection lock poisoned, dropping update: {}", e);
                return;
            }
        };

        // The connection lock is released here; a stalled write only holds
        // the writer lock, which teardown never takes.
        let written = match writer.lock() {
            Ok(mut stream) => stream.write_all(&frame),
            Err(e) => {
                debug!("Writer lock poisoned, dropping update: {}", e);
                return;
            }
        };

        if let Err(e) = written {
            // A disconnect or reconnect also breaks the write; only the live
            // connection turns that into an error.
            let reason = format!("Failed to send: {}", e);
            if self.owns(id)
                && self
                    .status
                    .publish_if(ConnectionStatus::is_connected, ConnectionStatus::Error(reason))
            {
                warn!("Write to {} failed: {}", self.config.server_addr, e);
            }
        }
    }

    /// Cancel the loops and close the channel. Close errors are ignored.
    fn release(&self) -> Result<()> {
        if let Some(connection) = self.connection.lock()?.take() {
            connection.close();
        }
        Ok(())
    }
}

fn open(inner: &Arc<SessionInner>) -> Result<()> {
    let target = resolve(&inner.config.server_addr)?;
    let stream = TcpStream::connect_timeout(&target, inner.config.connect_timeout)?;
    stream.set_nodelay(true)?;
    stream.set_write_timeout(Some(inner.config.write_timeout))?;
    let reader = stream.try_clone()?;
    let control = stream.try_clone()?;

    let id = inner.next_id.fetch_add(1, Ordering::SeqCst);
    let cancelled = Arc::new(AtomicBool::new(false));
    let (stop_tx, stop_rx) = unbounded::<()>();

    *inner.connection.lock()? = Some(Connection {
        id,
        control,
        writer: Arc::new(Mutex::new(stream)),
        cancelled: Arc::clone(&cancelled),
        _stop_tx: stop_tx,
    });
    inner.status.publish(ConnectionStatus::Connected);
    info!("Connected to {}", target);

    let receiver = Arc::clone(inner);
    thread::spawn(move || receive_loop(receiver, reader, id, cancelled));
    let sender = Arc::clone(inner);
    thread::spawn(move || send_loop(sender, stop_rx));
    Ok(())
}

fn receive_loop(inner: Arc<SessionInner>, reader: TcpStream, id: u64, cancelled: Arc<AtomicBool>) {
    let mut reader = BufReader::new(reader);
    let mut frame = Vec::new();

    let failure = loop {
        frame.clear();
        let read = reader.read_until(FRAME_DELIMITER, &mut frame);
        if cancelled.load(Ordering::SeqCst) {
            debug!("Receive loop cancelled");
            return;
        }
        match read {
            Ok(0) => break "Connection closed by peer".to_string(),
            Ok(_) => match PriceSnapshot::from_frame_bytes(&frame) {
                Ok(snapshot) => inner.relay.push(snapshot),
                Err(e) => debug!("Skipping malformed frame: {}", e),
            },
            Err(e) => break format!("Receive error: {}", e),
        }
    };

    let _lifecycle = inner.lifecycle();
    if !inner.owns(id) {
        debug!("Connection {} already replaced, skipping teardown", id);
        return;
    }
    warn!("Session lost: {}", failure);
    inner.status.publish(ConnectionStatus::Error(failure));
    if let Err(e) = inner.release() {
        debug!("Ignoring teardown error: {}", e);
    }
    inner.status.publish(ConnectionStatus::Disconnected);
}

fn send_loop(inner: Arc<SessionInner>, stop_rx: Receiver<()>) {
    let batches = PriceGenerator::from_catalog().start(inner.config.update_interval);
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(batches) -> batch => match batch {
                Ok(batch) => {
                    if inner.is_connected() {
                        for snapshot in &batch {
                            inner.send(snapshot);
                        }
                    }
                }
                Err(_) => break,
            },
        }
    }
    debug!("Send loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{SocketAddr, TcpListener};

    /// Accepts connections and keeps them open without reading or writing.
    fn silent_peer() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming() {
                held.push(stream);
            }
        });
        addr
    }

    fn quiet_session(addr: SocketAddr) -> TcpSession {
        TcpSession::new(
            SessionConfig::new(addr.to_string()).with_update_interval(Duration::from_secs(600)),
        )
    }

    fn live_id(session: &TcpSession) -> u64 {
        session.inner.connection.lock().unwrap().as_ref().unwrap().id
    }

    #[test]
    fn config_builder() {
        let config = SessionConfig::new("10.0.0.1:9000")
            .with_update_interval(Duration::from_millis(100))
            .with_connect_timeout(Duration::from_secs(1));

        assert_eq!(config.server_addr, "10.0.0.1:9000");
        assert_eq!(config.update_interval, Duration::from_millis(100));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.update_interval, Duration::from_millis(2000));
        assert_eq!(config.connect_timeout, Duration::from_millis(5000));
        assert_eq!(config.write_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn fresh_session_is_disconnected() {
        let session = TcpSession::new(SessionConfig::default());
        assert!(!session.is_connected());
        assert_eq!(
            session.observe_status().try_recv().unwrap(),
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn disconnect_without_connect_is_harmless() {
        let session = TcpSession::new(SessionConfig::default());
        session.disconnect().unwrap();
        session.disconnect().unwrap();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn send_while_disconnected_is_dropped() {
        let session = TcpSession::new(SessionConfig::default());
        session.send(&PriceSnapshot::now("AAPL", 1.0, 1.0));
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
        assert!(session.observe_incoming().try_recv().is_err());
    }

    #[test]
    fn unresolvable_address_ends_in_error() {
        let session = TcpSession::new(SessionConfig::new("not an address"));
        let statuses: Vec<_> = session.connect().try_iter().collect();

        assert_eq!(statuses[0], ConnectionStatus::Connecting);
        assert!(matches!(statuses[1], ConnectionStatus::Error(_)));
        assert!(matches!(session.status(), ConnectionStatus::Error(_)));
        assert!(!session.is_connected());
    }

    #[test]
    fn write_failure_reports_error_without_teardown() {
        let session = quiet_session(silent_peer());
        session.connect();
        assert!(session.is_connected());

        session
            .inner
            .connection
            .lock()
            .unwrap()
            .as_ref()
            .unwrap()
            .control
            .shutdown(Shutdown::Write)
            .unwrap();
        session.send(&PriceSnapshot::now("AAPL", 1.0, 1.0));

        match session.status() {
            ConnectionStatus::Error(reason) => assert!(reason.starts_with("Failed to send")),
            other => panic!("expected a send error, got {:?}", other),
        }
        assert!(session.inner.connection.lock().unwrap().is_some());
        assert!(!session.is_connected());

        session.disconnect().unwrap();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn stale_receive_loop_leaves_replacement_alone() {
        let session = quiet_session(silent_peer());
        session.connect();
        let first = live_id(&session);
        session.disconnect().unwrap();
        session.connect();
        assert_ne!(live_id(&session), first);

        // A reader of the first connection that only now sees end of stream.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let reader = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        drop(listener.accept().unwrap());
        receive_loop(
            Arc::clone(&session.inner),
            reader,
            first,
            Arc::new(AtomicBool::new(false)),
        );

        assert_eq!(session.status(), ConnectionStatus::Connected);
        assert!(session.is_connected());
        session.disconnect().unwrap();
    }

    #[test]
    fn owning_receive_loop_tears_down_on_peer_close() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let session = quiet_session(listener.local_addr().unwrap());
        let statuses = session.observe_status();
        session.connect();
        let (peer, _) = listener.accept().unwrap();
        peer.shutdown(Shutdown::Write).unwrap();

        let mut seen = Vec::new();
        while seen.last() != Some(&ConnectionStatus::Disconnected) || seen.len() < 4 {
            seen.push(statuses.recv_timeout(Duration::from_secs(5)).unwrap());
        }
        assert_eq!(
            seen,
            vec![
                ConnectionStatus::Disconnected,
                ConnectionStatus::Connecting,
                ConnectionStatus::Connected,
                ConnectionStatus::Error("Connection closed by peer".to_string()),
                ConnectionStatus::Disconnected,
            ]
        );
        assert!(session.inner.connection.lock().unwrap().is_none());
    }
}
