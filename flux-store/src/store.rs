//! Store contract and shared store plumbing
//!
//! This module provides:
//! - `Store`: the capability set every cached slice of state exposes
//! - `ChangeNotifier`: the object-safe subset views subscribe through
//! - `StoreCore`: load-state table plus the "changed" observable
//! - `StoreDefinition`: names a store and its item type at compile time

use std::fmt;

use tracing::trace;

use crate::key::NormalizedKey;
use crate::load_state::{LoadState, LoadStateTable};
use crate::observable::{Observable, SubscriptionId};

// ============================================================================
// StoreDefinition
// ============================================================================

/// Compile-time description of a concrete store
///
/// Generic store kinds (`KeyedStore`, `CollectionStore`, `ValueStore`) are
/// parameterized by a definition, so every concrete store is a distinct
/// type and gets its own registry slot.
///
/// # Example
///
/// ```rust
/// use flux_store::StoreDefinition;
///
/// pub struct AreaPaths;
///
/// impl StoreDefinition for AreaPaths {
///     const KEY: &'static str = "AreaPathStore";
///     type Item = Vec<String>;
/// }
/// ```
pub trait StoreDefinition: Send + Sync + 'static {
    /// Stable store identifier used in diagnostics and change events
    const KEY: &'static str;

    /// Cached value type
    type Item: Clone + Send + Sync + 'static;
}

// ============================================================================
// StoreCore
// ============================================================================

/// State shared by every store: its key, load flags and change listeners
pub struct StoreCore {
    key: &'static str,
    load_states: LoadStateTable,
    changed: Observable<()>,
}

impl StoreCore {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            load_states: LoadStateTable::new(),
            changed: Observable::new(),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn load_states(&self) -> &LoadStateTable {
        &self.load_states
    }

    pub fn add_changed_listener<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.changed.subscribe(move |_: &(), _: &()| listener())
    }

    pub fn remove_changed_listener(&self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }

    /// Notify every change listener; carries no payload
    pub fn emit_changed(&self) {
        trace!(store = self.key, "changed");
        self.changed.notify(&(), &());
    }

    pub fn changed_listener_count(&self) -> usize {
        self.changed.len()
    }
}

impl fmt::Debug for StoreCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCore")
            .field("key", &self.key)
            .field("changed_listeners", &self.changed.len())
            .finish()
    }
}

// ============================================================================
// Store
// ============================================================================

/// A cached slice of remote state, mutated only by its own action listeners
///
/// Reads are synchronous and never fetch. Load-state accessors take an
/// optional key: `None` addresses the store as a whole.
pub trait Store: Send + Sync + 'static {
    /// Lookup key type (`str` for id-keyed stores, `()` for singletons)
    type Key: ?Sized;

    /// Value returned by `get_item`
    type Item;

    /// Stable identifier for this store type
    fn key(&self) -> &'static str;

    /// Cached value for `key`, or `None` when absent
    fn get_item(&self, key: &Self::Key) -> Option<Self::Item>;

    /// Normalized form of `key` used for load-state bookkeeping
    fn convert_key_to_string(key: &Self::Key) -> NormalizedKey;

    /// Subscribe the store's mutation callback to the actions it owns
    ///
    /// Called once from the constructor.
    fn initialize_action_listeners(&mut self);

    fn core(&self) -> &StoreCore;

    /// Load-state slot addressed by `key`
    ///
    /// Stores with a single store-wide load state map every key to `None`.
    fn load_state_key(key: Option<&Self::Key>) -> Option<NormalizedKey> {
        key.map(Self::convert_key_to_string)
    }

    fn set_loading(&self, loading: bool, key: Option<&Self::Key>) {
        let key = Self::load_state_key(key);
        self.core().load_states().set_loading(loading, key.as_ref());
    }

    /// Mark `key` as loading unless a load is already in flight
    fn try_begin_loading(&self, key: Option<&Self::Key>) -> bool {
        let key = Self::load_state_key(key);
        self.core().load_states().try_begin_loading(key.as_ref())
    }

    fn is_loading(&self, key: Option<&Self::Key>) -> bool {
        let key = Self::load_state_key(key);
        self.core().load_states().is_loading(key.as_ref())
    }

    fn is_loaded(&self, key: Option<&Self::Key>) -> bool {
        let key = Self::load_state_key(key);
        self.core().load_states().is_loaded(key.as_ref())
    }

    fn load_state(&self, key: Option<&Self::Key>) -> LoadState {
        let key = Self::load_state_key(key);
        self.core().load_states().state(key.as_ref())
    }

    fn add_changed_listener<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.core().add_changed_listener(listener)
    }

    fn remove_changed_listener(&self, id: SubscriptionId) -> bool {
        self.core().remove_changed_listener(id)
    }

    fn emit_changed(&self) {
        self.core().emit_changed();
    }
}

// ============================================================================
// ChangeNotifier
// ============================================================================

/// Object-safe view of a store used by bindings and watchers
pub trait ChangeNotifier: Send + Sync {
    fn store_key(&self) -> &'static str;

    fn subscribe_changed(&self, listener: Box<dyn Fn() + Send + Sync>) -> SubscriptionId;

    fn unsubscribe_changed(&self, id: SubscriptionId) -> bool;
}

impl<S: Store> ChangeNotifier for S {
    fn store_key(&self) -> &'static str {
        self.key()
    }

    fn subscribe_changed(&self, listener: Box<dyn Fn() + Send + Sync>) -> SubscriptionId {
        self.core().add_changed_listener(move || listener())
    }

    fn unsubscribe_changed(&self, id: SubscriptionId) -> bool {
        self.core().remove_changed_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_core_emit_changed() {
        let core = StoreCore::new("TestStore");
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let id = core.add_changed_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        core.emit_changed();
        core.emit_changed();
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert!(core.remove_changed_listener(id));
        core.emit_changed();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(core.changed_listener_count(), 0);
    }

    #[test]
    fn test_core_key() {
        let core = StoreCore::new("TeamStore");
        assert_eq!(core.key(), "TeamStore");
        assert!(format!("{:?}", core).contains("TeamStore"));
    }
}
