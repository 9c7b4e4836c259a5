//! Stores keyed by case-insensitive identifiers
//!
//! A `KeyedStore<D>` caches one `D::Item` per key. Each key has its own load
//! state, so a store of "templates per team" can load teams independently.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::action::Action;
use crate::key::NormalizedKey;
use crate::observable::SubscriptionId;
use crate::registry::{FromRegistry, StoreRegistry};
use crate::store::{Store, StoreCore, StoreDefinition};

/// Payload of a keyed store's action channel
#[derive(Debug, Clone, PartialEq)]
pub enum KeyedUpdate<V> {
    /// A load for `key` finished; `None` re-announces the current cache
    Loaded { key: NormalizedKey, value: Option<V> },
    /// Insert or replace the entry for `key`
    Upsert { key: NormalizedKey, value: V },
    /// Drop the entry for `key`
    Remove { key: NormalizedKey },
    /// Drop every entry and reset every load state
    Clean,
}

/// Action channel owned by a `KeyedStore<D>`
pub struct KeyedActions<D: StoreDefinition> {
    pub update: Action<KeyedUpdate<D::Item>>,
}

impl<D: StoreDefinition> KeyedActions<D> {
    pub fn new() -> Self {
        Self {
            update: Action::new(D::KEY),
        }
    }

    pub fn loaded(&self, key: impl Into<NormalizedKey>, value: Option<D::Item>) {
        self.update.invoke(KeyedUpdate::Loaded {
            key: key.into(),
            value,
        });
    }

    pub fn upsert(&self, key: impl Into<NormalizedKey>, value: D::Item) {
        self.update.invoke(KeyedUpdate::Upsert {
            key: key.into(),
            value,
        });
    }

    pub fn remove(&self, key: impl Into<NormalizedKey>) {
        self.update.invoke(KeyedUpdate::Remove { key: key.into() });
    }

    pub fn clean(&self) {
        self.update.invoke(KeyedUpdate::Clean);
    }
}

impl<D: StoreDefinition> Default for KeyedActions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StoreDefinition> FromRegistry for KeyedActions<D> {
    fn from_registry(_registry: &StoreRegistry) -> Self {
        Self::new()
    }
}

struct KeyedState<D: StoreDefinition> {
    core: StoreCore,
    items: RwLock<HashMap<NormalizedKey, D::Item>>,
}

impl<D: StoreDefinition> KeyedState<D> {
    fn apply(&self, update: &KeyedUpdate<D::Item>) {
        match update {
            KeyedUpdate::Loaded { key, value } => {
                if let Some(value) = value {
                    self.items.write().insert(key.clone(), value.clone());
                }
                self.core.load_states().set_loaded(true, Some(key));
            }
            KeyedUpdate::Upsert { key, value } => {
                self.items.write().insert(key.clone(), value.clone());
            }
            KeyedUpdate::Remove { key } => {
                self.items.write().remove(key);
            }
            KeyedUpdate::Clean => {
                self.items.write().clear();
                self.core.load_states().reset();
                debug!(store = D::KEY, "Store cleaned");
            }
        }

        // Emitted even for an empty payload so views can react to "loaded with nothing"
        self.core.emit_changed();
    }
}

/// Cache of one item per case-insensitive key
pub struct KeyedStore<D: StoreDefinition> {
    state: Arc<KeyedState<D>>,
    actions: Arc<KeyedActions<D>>,
    subscription: Option<SubscriptionId>,
}

impl<D: StoreDefinition> KeyedStore<D> {
    /// Create the store and subscribe it to `actions`
    pub fn new(actions: Arc<KeyedActions<D>>) -> Self {
        let mut store = Self {
            state: Arc::new(KeyedState {
                core: StoreCore::new(D::KEY),
                items: RwLock::new(HashMap::new()),
            }),
            actions,
            subscription: None,
        };
        store.initialize_action_listeners();
        store
    }

    pub fn actions(&self) -> &Arc<KeyedActions<D>> {
        &self.actions
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.items.read().contains_key(&NormalizedKey::new(key))
    }

    /// Snapshot of every cached entry
    pub fn items(&self) -> HashMap<NormalizedKey, D::Item> {
        self.state.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.state.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.read().is_empty()
    }
}

impl<D: StoreDefinition> Store for KeyedStore<D> {
    type Key = str;
    type Item = D::Item;

    fn key(&self) -> &'static str {
        D::KEY
    }

    fn get_item(&self, key: &str) -> Option<D::Item> {
        self.state.items.read().get(&NormalizedKey::new(key)).cloned()
    }

    fn convert_key_to_string(key: &str) -> NormalizedKey {
        NormalizedKey::new(key)
    }

    fn initialize_action_listeners(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        let state = Arc::downgrade(&self.state);
        let id = self.actions.update.add_listener(move |update| {
            if let Some(state) = state.upgrade() {
                state.apply(update);
            }
        });
        self.subscription = Some(id);
    }

    fn core(&self) -> &StoreCore {
        &self.state.core
    }
}

impl<D: StoreDefinition> FromRegistry for KeyedStore<D> {
    fn from_registry(registry: &StoreRegistry) -> Self {
        Self::new(registry.get_instance::<KeyedActions<D>>())
    }
}

impl<D: StoreDefinition> Drop for KeyedStore<D> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.actions.update.remove_listener(id);
        }
    }
}

impl<D: StoreDefinition> fmt::Debug for KeyedStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedStore")
            .field("key", &D::KEY)
            .field("item_count", &self.len())
            .finish()
    }
}
