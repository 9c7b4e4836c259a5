//! Stores caching a whole collection loaded in one request
//!
//! Repositories, fields and work item types are fetched as a list once and
//! then looked up by id. The collection has a single, store-wide load state.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::action::Action;
use crate::key::NormalizedKey;
use crate::observable::SubscriptionId;
use crate::registry::{FromRegistry, StoreRegistry};
use crate::store::{Store, StoreCore, StoreDefinition};

/// Items that can live in a `CollectionStore`
pub trait CollectionItem {
    /// Identifier used for lookups; compared case-insensitively
    fn id(&self) -> &str;

    /// Name used for case-insensitive sorting
    fn display_name(&self) -> &str;
}

/// Payload of a collection store's action channel
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionUpdate<V> {
    /// The collection finished loading; `None` re-announces the current cache
    Loaded(Option<Vec<V>>),
    /// Insert an item, replacing one with the same id
    Added(V),
    /// Drop the item with this id
    Removed(NormalizedKey),
    /// Drop everything and reset the load state
    Clean,
}

/// Action channel owned by a `CollectionStore<D>`
pub struct CollectionActions<D: StoreDefinition> {
    pub update: Action<CollectionUpdate<D::Item>>,
}

impl<D: StoreDefinition> CollectionActions<D> {
    pub fn new() -> Self {
        Self {
            update: Action::new(D::KEY),
        }
    }

    pub fn loaded(&self, items: Option<Vec<D::Item>>) {
        self.update.invoke(CollectionUpdate::Loaded(items));
    }

    pub fn added(&self, item: D::Item) {
        self.update.invoke(CollectionUpdate::Added(item));
    }

    pub fn removed(&self, id: impl Into<NormalizedKey>) {
        self.update.invoke(CollectionUpdate::Removed(id.into()));
    }

    pub fn clean(&self) {
        self.update.invoke(CollectionUpdate::Clean);
    }
}

impl<D: StoreDefinition> Default for CollectionActions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StoreDefinition> FromRegistry for CollectionActions<D> {
    fn from_registry(_registry: &StoreRegistry) -> Self {
        Self::new()
    }
}

struct CollectionState<D: StoreDefinition> {
    core: StoreCore,
    items: RwLock<Option<Vec<D::Item>>>,
}

impl<D> CollectionState<D>
where
    D: StoreDefinition,
    D::Item: CollectionItem,
{
    fn apply(&self, update: &CollectionUpdate<D::Item>) {
        match update {
            CollectionUpdate::Loaded(items) => {
                if let Some(items) = items {
                    *self.items.write() = Some(items.clone());
                }
                self.core.load_states().set_loaded(true, None);
            }
            CollectionUpdate::Added(item) => {
                let key = NormalizedKey::new(item.id());
                let mut items = self.items.write();
                let items = items.get_or_insert_with(Vec::new);
                match items
                    .iter_mut()
                    .find(|existing| NormalizedKey::new(existing.id()) == key)
                {
                    Some(existing) => *existing = item.clone(),
                    None => items.push(item.clone()),
                }
            }
            CollectionUpdate::Removed(key) => {
                if let Some(items) = self.items.write().as_mut() {
                    items.retain(|item| NormalizedKey::new(item.id()) != *key);
                }
            }
            CollectionUpdate::Clean => {
                *self.items.write() = None;
                self.core.load_states().reset();
                debug!(store = D::KEY, "Store cleaned");
            }
        }

        self.core.emit_changed();
    }
}

/// Cache of a list of items addressed by id
pub struct CollectionStore<D: StoreDefinition>
where
    D::Item: CollectionItem,
{
    state: Arc<CollectionState<D>>,
    actions: Arc<CollectionActions<D>>,
    subscription: Option<SubscriptionId>,
}

impl<D> CollectionStore<D>
where
    D: StoreDefinition,
    D::Item: CollectionItem,
{
    pub fn new(actions: Arc<CollectionActions<D>>) -> Self {
        let mut store = Self {
            state: Arc::new(CollectionState {
                core: StoreCore::new(D::KEY),
                items: RwLock::new(None),
            }),
            actions,
            subscription: None,
        };
        store.initialize_action_listeners();
        store
    }

    pub fn actions(&self) -> &Arc<CollectionActions<D>> {
        &self.actions
    }

    /// Every cached item, or `None` before the first load
    pub fn get_all(&self) -> Option<Vec<D::Item>> {
        self.state.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.state.items.read().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D> Store for CollectionStore<D>
where
    D: StoreDefinition,
    D::Item: CollectionItem,
{
    type Key = str;
    type Item = D::Item;

    fn key(&self) -> &'static str {
        D::KEY
    }

    fn get_item(&self, id: &str) -> Option<D::Item> {
        let key = NormalizedKey::new(id);
        self.state
            .items
            .read()
            .as_ref()?
            .iter()
            .find(|item| NormalizedKey::new(item.id()) == key)
            .cloned()
    }

    fn convert_key_to_string(key: &str) -> NormalizedKey {
        NormalizedKey::new(key)
    }

    fn load_state_key(_key: Option<&str>) -> Option<NormalizedKey> {
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

impl<D> FromRegistry for CollectionStore<D>
where
    D: StoreDefinition,
    D::Item: CollectionItem,
{
    fn from_registry(registry: &StoreRegistry) -> Self {
        Self::new(registry.get_instance::<CollectionActions<D>>())
    }
}

impl<D> Drop for CollectionStore<D>
where
    D: StoreDefinition,
    D::Item: CollectionItem,
{
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.actions.update.remove_listener(id);
        }
    }
}

impl<D> fmt::Debug for CollectionStore<D>
where
    D: StoreDefinition,
    D::Item: CollectionItem,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionStore")
            .field("key", &D::KEY)
            .field("item_count", &self.len())
            .finish()
    }
}
