//! Replay-last-value fan-out over crossbeam channels.
//!
//! Every subscriber gets its own unbounded channel. A new subscriber first
//! receives the current value, then every published value in order. Subscribers
//! whose receiver was dropped are pruned on the next publish.
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::{Mutex, PoisonError};

struct Inner<T> {
    current: T,
    subscribers: Vec<Sender<T>>,
}

/// Holds the authoritative value and the live subscriber list.
pub struct Broadcast<T: Clone> {
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> Broadcast<T> {
    /// Create a broadcaster seeded with `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Copy of the current value.
    pub fn current(&self) -> T {
        self.lock().current.clone()
    }

    /// Subscribe; the current value is already queued on the returned receiver.
    pub fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        let mut inner = self.lock();
        if tx.send(inner.current.clone()).is_ok() {
            inner.subscribers.push(tx);
        }
        rx
    }

    /// Replace the current value and fan it out.
    pub fn publish(&self, value: T) {
        let mut inner = self.lock();
        inner.current = value.clone();
        inner.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Publish `value` only if the current value satisfies `pred`. Returns
    /// whether it was published.
    pub fn publish_if<P>(&self, pred: P, value: T) -> bool
    where
        P: FnOnce(&T) -> bool,
    {
        let mut inner = self.lock();
        if !pred(&inner.current) {
            return false;
        }
        inner.current = value.clone();
        inner.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        true
    }

    /// Read-modify-publish under one lock, so concurrent writers cannot
    /// interleave between the read and the publish.
    pub fn update<F>(&self, f: F) -> T
    where
        F: FnOnce(&mut T),
    {
        let mut inner = self.lock();
        f(&mut inner.current);
        let value = inner.current.clone();
        inner.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        value
    }

    // A panicking subscriber cannot corrupt the value; keep serving it.
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
