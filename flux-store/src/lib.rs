//! Flux-style state plumbing
//!
//! Action → Store → View, with cached reads and per-key load tracking.
//!
//! # Features
//!
//! - **Typed actions**: `Action<T>` broadcasts a typed payload to the stores
//!   that registered for it, with a diagnostic re-entrancy warning
//! - **Single-writer stores**: a store's items change only inside its own
//!   action listener; views read through `get_item` and load-state accessors
//! - **Load-state tracking**: per-key `loading`/`loaded` flags so callers can
//!   avoid duplicate fetches
//! - **Case-insensitive keys**: every keyed lookup goes through `NormalizedKey`
//! - **Explicit registry**: `StoreRegistry` hands out one instance per store
//!   type, owned by the application root rather than a global
//! - **View bindings**: `ComponentBinding` keeps derived view state in sync
//!   and unsubscribes on unmount
//!
//! # Quick Start
//!
//! ```rust
//! use flux_store::prelude::*;
//!
//! struct Templates;
//!
//! impl StoreDefinition for Templates {
//!     const KEY: &'static str = "WorkItemTemplateStore";
//!     type Item = Vec<String>;
//! }
//!
//! let registry = StoreRegistry::new();
//! let store = registry.get_instance::<KeyedStore<Templates>>();
//!
//! assert!(!store.is_loaded(Some("Web Team")));
//!
//! // Mutate only through the store's action channel
//! store.actions().loaded("Web Team", Some(vec!["Bug triage".to_string()]));
//!
//! assert!(store.is_loaded(Some("web team")));
//! assert_eq!(store.get_item("WEB TEAM"), Some(vec!["Bug triage".to_string()]));
//! ```
//!
//! # Architecture
//!
//! ```text
//! action creator ──invoke──▶ Action<Update>
//!                               │ (listener registered by the store)
//!                               ▼
//!                     Store { items, LoadStateTable }
//!                               │ emit_changed()
//!                               ▼
//!               ComponentBinding / StoreWatcher
//! ```

// Modules
pub mod action;
pub mod binding;
pub mod event;
pub mod iter;
pub mod key;
pub mod load_state;
pub mod observable;
pub mod registry;
pub mod store;
pub mod stores;

// Re-exports - Public API
pub use action::Action;
pub use binding::{ComponentBinding, FluxComponent};
pub use event::ChangeEvent;
pub use iter::{ChangeIterator, StoreWatcher, TimeoutIter, TryIter};
pub use key::{compare_ignore_case, NormalizedKey};
pub use load_state::{LoadState, LoadStateTable};
pub use observable::{Listener, Observable, SubscriptionId};
pub use registry::{FromRegistry, StoreRegistry};
pub use store::{ChangeNotifier, Store, StoreCore, StoreDefinition};
pub use stores::{
    CollectionActions, CollectionItem, CollectionStore, CollectionUpdate, KeyedActions,
    KeyedStore, KeyedUpdate, ValueActions, ValueStore, ValueUpdate,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::key::NormalizedKey;
    pub use crate::load_state::LoadState;
    pub use crate::registry::{FromRegistry, StoreRegistry};
    pub use crate::store::{ChangeNotifier, Store, StoreDefinition};
    pub use crate::stores::{
        CollectionActions, CollectionItem, CollectionStore, KeyedActions, KeyedStore,
        ValueActions, ValueStore,
    };
}
