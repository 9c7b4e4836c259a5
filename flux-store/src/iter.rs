//! Headless consumption of store change notifications
//!
//! A `StoreWatcher` subscribes to a set of stores and forwards each changed
//! notification into a `std::sync::mpsc` channel. Consume it with:
//! - Blocking: `recv()`, `for event in watcher.iter()`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`
//!
//! Dropping the watcher unsubscribes it from every store.

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use crate::event::ChangeEvent;
use crate::observable::SubscriptionId;
use crate::store::ChangeNotifier;

/// Forwards changed notifications of several stores into one channel
pub struct StoreWatcher {
    subscriptions: Vec<(Arc<dyn ChangeNotifier>, SubscriptionId)>,
    rx: Arc<Mutex<mpsc::Receiver<ChangeEvent>>>,
}

impl StoreWatcher {
    pub fn new(stores: Vec<Arc<dyn ChangeNotifier>>) -> Self {
        let (tx, rx) = mpsc::channel();

        let subscriptions = stores
            .into_iter()
            .map(|store| {
                let tx = tx.clone();
                let store_key = store.store_key();
                let id = store.subscribe_changed(Box::new(move || {
                    let _ = tx.send(ChangeEvent::new(store_key));
                }));
                (store, id)
            })
            .collect();

        Self {
            subscriptions,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Iterator over this watcher's events
    pub fn iter(&self) -> ChangeIterator {
        ChangeIterator::new(Arc::clone(&self.rx))
    }

    pub fn watched_stores(&self) -> Vec<&'static str> {
        self.subscriptions
            .iter()
            .map(|(store, _)| store.store_key())
            .collect()
    }
}

impl Drop for StoreWatcher {
    fn drop(&mut self) {
        for (store, id) in self.subscriptions.drain(..) {
            store.unsubscribe_changed(id);
        }
    }
}

/// Blocking iterator over store change events
///
/// Iteration ends when every sender is gone, which happens once the owning
/// `StoreWatcher` has been dropped.
pub struct ChangeIterator {
    rx: Arc<Mutex<mpsc::Receiver<ChangeEvent>>>,
}

impl ChangeIterator {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<ChangeEvent>>>) -> Self {
        Self { rx }
    }

    /// Block until the next event is available
    ///
    /// Returns `None` if the channel is closed.
    pub fn recv(&self) -> Option<ChangeEvent> {
        self.rx.lock().ok()?.recv().ok()
    }

    /// Block until the next event or timeout expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<ChangeEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Non-blocking iterator over currently queued events
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Iterator that waits up to `timeout` for each event
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for ChangeIterator {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// Non-blocking iterator over queued events
pub struct TryIter<'a> {
    inner: &'a ChangeIterator,
}

impl Iterator for TryIter<'_> {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a> {
    inner: &'a ChangeIterator,
    timeout: Duration,
}

impl Iterator for TimeoutIter<'_> {
    type Item = ChangeEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
