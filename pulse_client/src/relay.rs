//! Update relay: the buffer between the session's receive loop and whoever
//! consumes price updates.
//!
//! The queue is unbounded, so the receive loop never blocks on a slow
//! consumer; memory grows instead under sustained overload. Delivery is FIFO.
//! Receivers handed out by [`UpdateRelay::subscribe`] share one queue, so each
//! update is consumed exactly once.
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;
use pulse_common::PriceSnapshot;

/// Unbounded FIFO of decoded price snapshots.
#[derive(Clone)]
pub struct UpdateRelay {
    tx: Sender<PriceSnapshot>,
    rx: Receiver<PriceSnapshot>,
}

impl UpdateRelay {
    /// Empty relay.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Enqueue one update. Never blocks.
    pub fn push(&self, snapshot: PriceSnapshot) {
        // The relay owns a receiver, so the channel cannot be disconnected here.
        if self.tx.send(snapshot).is_err() {
            debug!("Update relay closed, dropping update");
        }
    }

    /// Consumer end. Idle until something is pushed.
    pub fn subscribe(&self) -> Receiver<PriceSnapshot> {
        self.rx.clone()
    }

    /// Updates waiting to be consumed.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for UpdateRelay {
    fn default() -> Self {
        Self::new()
    }
}
