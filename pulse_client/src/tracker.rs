//! State reducer behind the price view.
//!
//! A `PriceTracker` owns a worker thread that is the only writer of the stock
//! book and of the published [`TrackerState`]. The worker selects over three
//! inputs:
//! - commands from the handle (`start`, `stop`, shutdown),
//! - the session's authoritative status stream,
//! - incoming updates, but only while consuming; otherwise that arm is idle.
//!
//! Every accepted update is merged (last write wins per symbol), the ordered
//! view is rebuilt and a new state is published. Transient outcomes are sent
//! once on the notification queue.

use crossbeam_channel::{Receiver, Sender, never, select, unbounded};
use log::{debug, error, info, warn};
use pulse_common::PriceSnapshot;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::broadcast::Broadcast;
use crate::mapper;
use crate::model::status::ConnectionStatus;
use crate::model::stock_book::StockBook;
use crate::model::view::{Notification, TrackerState};
use crate::session::PriceSession;

/// Banner sent once the feed is live.
pub const CONNECTED_MESSAGE: &str = "Connected to price feed";
/// Banner sent after a successful stop.
pub const STOPPED_MESSAGE: &str = "Price feed stopped";

enum Command {
    Start,
    Stop,
    Shutdown,
}

/// Handle to the reducer worker. Dropping it stops the worker; the session is
/// left as it is.
pub struct PriceTracker {
    commands: Sender<Command>,
    state: Arc<Broadcast<TrackerState>>,
    notifications: Receiver<Notification>,
    worker: Option<JoinHandle<()>>,
}

impl PriceTracker {
    /// Spawn the worker for `session`. The status stream is subscribed right
    /// away, so transitions caused by other owners of the session are seen too.
    pub fn new<S: PriceSession>(session: Arc<S>) -> Self {
        let (commands, command_rx) = unbounded();
        let (notify_tx, notifications) = unbounded();
        let state = Arc::new(Broadcast::new(TrackerState::default()));
        let statuses = session.observe_status();

        let reducer = Reducer {
            session,
            state: Arc::clone(&state),
            notifications: notify_tx,
            book: StockBook::new(),
            updates: None,
        };
        let worker = thread::spawn(move || reducer.run(command_rx, statuses));

        Self {
            commands,
            state,
            notifications,
            worker: Some(worker),
        }
    }

    /// Connect and begin merging updates. Ignored while connected or busy.
    pub fn start(&self) {
        self.dispatch(Command::Start);
    }

    /// Stop merging and disconnect. Already merged stocks are kept.
    pub fn stop(&self) {
        self.dispatch(Command::Stop);
    }

    /// Latest published state.
    pub fn state(&self) -> TrackerState {
        self.state.current()
    }

    /// Current state followed by every published state.
    pub fn subscribe(&self) -> Receiver<TrackerState> {
        self.state.subscribe()
    }

    /// One-shot notifications. Clones share one queue.
    pub fn notifications(&self) -> Receiver<Notification> {
        self.notifications.clone()
    }

    fn dispatch(&self, command: Command) {
        if self.commands.send(command).is_err() {
            error!("Tracker worker is gone, command dropped");
        }
    }
}

impl Drop for PriceTracker {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct Reducer<S: PriceSession> {
    session: Arc<S>,
    state: Arc<Broadcast<TrackerState>>,
    notifications: Sender<Notification>,
    book: StockBook,
    // `Some` while consuming updates.
    updates: Option<Receiver<PriceSnapshot>>,
}

impl<S: PriceSession> Reducer<S> {
    fn run(mut self, commands: Receiver<Command>, mut statuses: Receiver<ConnectionStatus>) {
        debug!("Tracker worker started");
        loop {
            let updates = self.updates.clone().unwrap_or_else(never);
            select! {
                recv(commands) -> command => match command {
                    Ok(Command::Start) => self.start(),
                    Ok(Command::Stop) => self.stop(),
                    Ok(Command::Shutdown) | Err(_) => break,
                },
                recv(statuses) -> status => match status {
                    Ok(status) => self.on_status(status),
                    Err(_) => {
                        warn!("Session status stream closed");
                        statuses = never();
                    }
                },
                recv(updates) -> update => {
                    if let Ok(snapshot) = update {
                        self.on_update(&snapshot);
                    }
                },
            }
        }
        debug!("Tracker worker stopped");
    }

    fn start(&mut self) {
        let current = self.state.current();
        if current.is_loading || current.connection_status.is_connected() {
            debug!("Start ignored: feed is {}", current.connection_status);
            return;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });
        info!("Starting price feed");
        for status in self.session.connect().try_iter() {
            debug!("Connect attempt: {}", status);
        }
    }

    fn stop(&mut self) {
        let current = self.state.current();
        if current.connection_status.is_disconnected()
            && !current.is_loading
            && self.updates.is_none()
        {
            debug!("Stop ignored: feed already stopped");
            return;
        }

        self.state.update(|s| s.is_loading = true);
        self.updates = None;

        match self.session.disconnect() {
            Ok(()) => {
                self.state.update(|s| {
                    s.connection_status = ConnectionStatus::Disconnected;
                    s.is_loading = false;
                });
                info!("Price feed stopped");
                self.notify(Notification::Info(STOPPED_MESSAGE.to_string()));
            }
            Err(e) => {
                let message = e.to_string();
                error!("Failed to stop price feed: {}", message);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                self.notify(Notification::Error(message));
            }
        }
    }

    fn on_status(&mut self, status: ConnectionStatus) {
        if self.state.current().connection_status == status {
            return;
        }
        debug!("Session status: {}", status);

        match status {
            ConnectionStatus::Connecting => {
                self.state.update(|s| s.connection_status = ConnectionStatus::Connecting);
            }
            ConnectionStatus::Connected => {
                self.state.update(|s| {
                    s.connection_status = ConnectionStatus::Connected;
                    s.is_loading = false;
                });
                if self.updates.is_none() {
                    self.updates = Some(self.session.observe_incoming());
                }
                self.notify(Notification::Success(CONNECTED_MESSAGE.to_string()));
            }
            ConnectionStatus::Error(message) => {
                warn!("Price feed error: {}", message);
                self.state.update(|s| {
                    s.connection_status = ConnectionStatus::Error(message.clone());
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                self.notify(Notification::Error(message));
            }
            ConnectionStatus::Disconnected => {
                self.updates = None;
                self.state.update(|s| {
                    s.connection_status = ConnectionStatus::Disconnected;
                    s.is_loading = false;
                });
            }
        }
    }

    fn on_update(&mut self, snapshot: &PriceSnapshot) {
        self.book.merge(mapper::to_domain(snapshot));
        let stocks = mapper::to_ui_list(&self.book.ordered());
        self.state.update(|s| s.stocks = stocks);
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("No notification consumer");
        }
    }
}
