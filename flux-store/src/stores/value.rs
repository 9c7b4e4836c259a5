//! Stores holding a single value

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::action::Action;
use crate::key::NormalizedKey;
use crate::observable::SubscriptionId;
use crate::registry::{FromRegistry, StoreRegistry};
use crate::store::{Store, StoreCore, StoreDefinition};

/// Payload of a value store's action channel
#[derive(Debug, Clone, PartialEq)]
pub enum ValueUpdate<V> {
    /// A load finished; `None` re-announces the current value
    Loaded(Option<V>),
    /// Replace the value
    Set(V),
    /// Drop the value but keep the load state
    Clear,
    /// Drop the value and reset the load state
    Clean,
}

/// Action channel owned by a `ValueStore<D>`
pub struct ValueActions<D: StoreDefinition> {
    pub update: Action<ValueUpdate<D::Item>>,
}

impl<D: StoreDefinition> ValueActions<D> {
    pub fn new() -> Self {
        Self {
            update: Action::new(D::KEY),
        }
    }

    pub fn loaded(&self, value: Option<D::Item>) {
        self.update.invoke(ValueUpdate::Loaded(value));
    }

    pub fn set(&self, value: D::Item) {
        self.update.invoke(ValueUpdate::Set(value));
    }

    pub fn clear(&self) {
        self.update.invoke(ValueUpdate::Clear);
    }

    pub fn clean(&self) {
        self.update.invoke(ValueUpdate::Clean);
    }
}

impl<D: StoreDefinition> Default for ValueActions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StoreDefinition> FromRegistry for ValueActions<D> {
    fn from_registry(_registry: &StoreRegistry) -> Self {
        Self::new()
    }
}

struct ValueState<D: StoreDefinition> {
    core: StoreCore,
    value: RwLock<Option<D::Item>>,
}

impl<D: StoreDefinition> ValueState<D> {
    fn apply(&self, update: &ValueUpdate<D::Item>) {
        match update {
            ValueUpdate::Loaded(value) => {
                if let Some(value) = value {
                    *self.value.write() = Some(value.clone());
                }
                self.core.load_states().set_loaded(true, None);
            }
            ValueUpdate::Set(value) => {
                *self.value.write() = Some(value.clone());
            }
            ValueUpdate::Clear => {
                *self.value.write() = None;
            }
            ValueUpdate::Clean => {
                *self.value.write() = None;
                self.core.load_states().reset();
                debug!(store = D::KEY, "Store cleaned");
            }
        }

        self.core.emit_changed();
    }
}

/// Singleton value cache
pub struct ValueStore<D: StoreDefinition> {
    state: Arc<ValueState<D>>,
    actions: Arc<ValueActions<D>>,
    subscription: Option<SubscriptionId>,
}

impl<D: StoreDefinition> ValueStore<D> {
    pub fn new(actions: Arc<ValueActions<D>>) -> Self {
        let mut store = Self {
            state: Arc::new(ValueState {
                core: StoreCore::new(D::KEY),
                value: RwLock::new(None),
            }),
            actions,
            subscription: None,
        };
        store.initialize_action_listeners();
        store
    }

    pub fn actions(&self) -> &Arc<ValueActions<D>> {
        &self.actions
    }

    /// Shorthand for `get_item(&())`
    pub fn value(&self) -> Option<D::Item> {
        self.state.value.read().clone()
    }
}

impl<D: StoreDefinition> Store for ValueStore<D> {
    type Key = ();
    type Item = D::Item;

    fn key(&self) -> &'static str {
        D::KEY
    }

    fn get_item(&self, _key: &()) -> Option<D::Item> {
        self.value()
    }

    fn convert_key_to_string(_key: &()) -> NormalizedKey {
        NormalizedKey::new(D::KEY)
    }

    fn load_state_key(_key: Option<&()>) -> Option<NormalizedKey> {
        None
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

impl<D: StoreDefinition> FromRegistry for ValueStore<D> {
    fn from_registry(registry: &StoreRegistry) -> Self {
        Self::new(registry.get_instance::<ValueActions<D>>())
    }
}

impl<D: StoreDefinition> Drop for ValueStore<D> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.actions.update.remove_listener(id);
        }
    }
}

impl<D: StoreDefinition> fmt::Debug for ValueStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStore")
            .field("key", &D::KEY)
            .field("has_value", &self.state.value.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Banner;

    impl StoreDefinition for Banner {
        const KEY: &'static str = "BannerStore";
        type Item = String;
    }

    #[test]
    fn test_value_lifecycle() {
        let store = ValueStore::<Banner>::new(Arc::new(ValueActions::new()));
        assert!(store.value().is_none());
        assert!(!store.is_loaded(None));
        assert!(!store.is_loading(None));

        store.actions().loaded(Some("hello".to_string()));
        assert!(store.is_loaded(None));
        assert_eq!(store.get_item(&()), Some("hello".to_string()));

        store.actions().clear();
        assert!(store.value().is_none());
        assert!(store.is_loaded(None));

        store.actions().set("again".to_string());
        store.actions().clean();
        assert!(store.value().is_none());
        assert!(!store.is_loaded(None));
    }

    #[test]
    fn test_unit_key_shares_store_wide_load_state() {
        let store = ValueStore::<Banner>::new(Arc::new(ValueActions::new()));

        store.set_loading(true, Some(&()));
        assert!(store.is_loading(None));
        assert!(!store.try_begin_loading(None));

        store.actions().loaded(Some("x".to_string()));
        store.set_loading(false, None);
        assert!(store.is_loaded(Some(&())));
        assert!(!store.is_loading(Some(&())));
        assert_eq!(store.load_state(Some(&())), store.load_state(None));
    }
}
