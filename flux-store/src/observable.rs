//! Minimal publish/subscribe channel
//!
//! An `Observable` holds an ordered list of listener callbacks. Calling
//! `notify()` invokes each of them synchronously on the calling thread, in
//! the order they were subscribed.
//!
//! # Example
//!
//! ```rust
//! use flux_store::Observable;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let observable = Observable::<u32>::new();
//!
//! let sink = Arc::clone(&seen);
//! let id = observable.subscribe(move |value: &u32, _: &()| sink.lock().unwrap().push(*value));
//!
//! observable.notify(&1, &());
//! observable.unsubscribe(id);
//! observable.notify(&2, &());
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

/// Handle returned by `subscribe`, used to remove the registration again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Listener callback receiving the payload and the notification context
pub type Listener<T, C> = Arc<dyn Fn(&T, &C) + Send + Sync + 'static>;

/// Publish/subscribe channel with synchronous, ordered delivery
///
/// No buffering: a `notify` with no listeners drops the payload. Listeners
/// may call back into the same observable (notify, subscribe or unsubscribe);
/// the listener list is snapshotted before delivery, so a listener removed
/// during a notification still receives that in-flight notification but none
/// after it.
pub struct Observable<T, C = ()> {
    listeners: RwLock<Vec<(SubscriptionId, Listener<T, C>)>>,
}

impl<T, C> Observable<T, C> {
    /// Create an observable with no listeners
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener, returning the id needed to remove it
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T, &C) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Remove a registration, returning whether it existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every current listener with `payload` and `context`
    pub fn notify(&self, payload: &T, context: &C) {
        let snapshot: Vec<Listener<T, C>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!(listeners = snapshot.len(), "notify");

        for listener in snapshot {
            listener(payload, context);
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.listeners.write().clear();
    }
}

impl<T, C> Default for Observable<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> fmt::Debug for Observable<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("listener_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    fn recorder(log: &Arc<Mutex<Vec<(usize, u32)>>>, tag: usize) -> impl Fn(&u32, &()) + Send + Sync {
        let log = Arc::clone(log);
        move |value: &u32, _: &()| log.lock().push((tag, *value))
    }

    #[test]
    fn test_notify_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let observable = Observable::<u32>::new();

        observable.subscribe(recorder(&log, 0));
        observable.subscribe(recorder(&log, 1));
        observable.subscribe(recorder(&log, 2));

        observable.notify(&7, &());

        assert_eq!(*log.lock(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_notify_without_listeners_drops_payload() {
        let observable = Observable::<String>::new();
        assert!(observable.is_empty());
        observable.notify(&"dropped".to_string(), &());

        // A listener added afterwards sees nothing buffered
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        observable.subscribe(move |value: &String, _: &()| sink.lock().push(value.clone()));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let observable = Observable::<u32>::new();
        let id = observable.subscribe(|_: &u32, _: &()| {});

        assert!(observable.unsubscribe(id));
        assert!(!observable.unsubscribe(id));
        assert_eq!(observable.len(), 0);
    }

    #[test]
    fn test_context_is_forwarded() {
        let observable = Observable::<u32, &'static str>::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        observable.subscribe(move |value: &u32, context: &&'static str| {
            sink.lock().push(format!("{}:{}", context, value))
        });

        observable.notify(&3, &"ctx");
        assert_eq!(*log.lock(), vec!["ctx:3".to_string()]);
    }

    #[test]
    fn test_reentrant_notify_nests() {
        let observable = Arc::new(Observable::<u32>::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::downgrade(&observable);
        let sink = Arc::clone(&log);
        observable.subscribe(move |value: &u32, _: &()| {
            sink.lock().push(*value);
            if *value > 0 {
                if let Some(observable) = inner.upgrade() {
                    observable.notify(&(value - 1), &());
                }
            }
        });

        observable.notify(&3, &());
        assert_eq!(*log.lock(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let observable = Arc::new(Observable::<u32>::new());
        let calls = Arc::new(Mutex::new(0));
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));

        let weak = Arc::downgrade(&observable);
        let counter = Arc::clone(&calls);
        let id_slot = Arc::clone(&own_id);
        let id = observable.subscribe(move |_: &u32, _: &()| {
            *counter.lock() += 1;
            if let (Some(observable), Some(id)) = (weak.upgrade(), *id_slot.lock()) {
                observable.unsubscribe(id);
            }
        });
        *own_id.lock() = Some(id);

        observable.notify(&1, &());
        observable.notify(&2, &());

        assert_eq!(*calls.lock(), 1);
        assert!(observable.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Subscribe,
        Unsubscribe(usize),
        Notify(u32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Subscribe),
            (0usize..8).prop_map(Op::Unsubscribe),
            any::<u32>().prop_map(Op::Notify),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every live listener gets exactly one call per notify, in
        /// subscription order; removed listeners get nothing afterwards.
        #[test]
        fn prop_delivery_matches_live_subscriptions(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let observable = Observable::<u32>::new();
            let mut live: Vec<(usize, SubscriptionId)> = Vec::new();
            let mut expected: Vec<(usize, u32)> = Vec::new();
            let mut next_tag = 0usize;

            for op in ops {
                match op {
                    Op::Subscribe => {
                        let id = observable.subscribe(recorder(&log, next_tag));
                        live.push((next_tag, id));
                        next_tag += 1;
                    }
                    Op::Unsubscribe(index) => {
                        if !live.is_empty() {
                            let (_, id) = live.remove(index % live.len());
                            prop_assert!(observable.unsubscribe(id));
                        }
                    }
                    Op::Notify(value) => {
                        observable.notify(&value, &());
                        expected.extend(live.iter().map(|(tag, _)| (*tag, value)));
                    }
                }
            }

            prop_assert_eq!(log.lock().clone(), expected);
        }
    }
}
