//! Lazily-populated registry handing out one instance per type
//!
//! The registry is an ordinary value owned by the application root; nothing
//! here is global. Stores and action channels are created the first time
//! they are requested and live as long as the registry.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use flux_store::{KeyedStore, StoreDefinition, StoreRegistry};
//!
//! struct Settings;
//! impl StoreDefinition for Settings {
//!     const KEY: &'static str = "SettingsStore";
//!     type Item = String;
//! }
//!
//! let registry = StoreRegistry::new();
//! let a = registry.get_instance::<KeyedStore<Settings>>();
//! let b = registry.get_instance::<KeyedStore<Settings>>();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

/// Types the registry knows how to construct
///
/// `from_registry` may request its own dependencies (a store asks for its
/// action channel) from the same registry.
pub trait FromRegistry: Send + Sync + 'static {
    fn from_registry(registry: &StoreRegistry) -> Self;
}

/// Type-keyed map of shared instances
#[derive(Default)]
pub struct StoreRegistry {
    instances: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the instance of `T`, constructing and registering it on first use
    ///
    /// Construction runs without holding the registry lock. If two threads
    /// race on the first request, the instance registered first is returned
    /// to both and the other is dropped.
    pub fn get_instance<T: FromRegistry>(&self) -> Arc<T> {
        if let Some(existing) = self.lookup::<T>() {
            return existing;
        }

        let created: Arc<dyn Any + Send + Sync> = Arc::new(T::from_registry(self));

        let mut instances = self.instances.lock();
        let entry = instances.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(instance = type_name::<T>(), "Registered instance");
            created
        });
        Self::downcast(Arc::clone(entry))
    }

    /// Register a pre-built instance; returns `false` if `T` already has one
    pub fn register<T: Send + Sync + 'static>(&self, instance: Arc<T>) -> bool {
        let mut instances = self.instances.lock();
        if instances.contains_key(&TypeId::of::<T>()) {
            return false;
        }
        instances.insert(TypeId::of::<T>(), instance);
        true
    }

    /// Existing instance of `T`, without constructing one
    pub fn lookup<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let instances = self.instances.lock();
        instances
            .get(&TypeId::of::<T>())
            .map(|instance| Self::downcast(Arc::clone(instance)))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.instances.lock().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }

    fn downcast<T: Send + Sync + 'static>(instance: Arc<dyn Any + Send + Sync>) -> Arc<T> {
        instance
            .downcast::<T>()
            .unwrap_or_else(|_| panic!("StoreRegistry: type mismatch for {} (this is a bug)", type_name::<T>()))
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("instance_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{KeyedActions, KeyedStore, ValueStore};
    use crate::store::StoreDefinition;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Teams;
    impl StoreDefinition for Teams {
        const KEY: &'static str = "TeamStore";
        type Item = Vec<String>;
    }

    struct Banner;
    impl StoreDefinition for Banner {
        const KEY: &'static str = "BannerStore";
        type Item = String;
    }

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;
    impl FromRegistry for Counted {
        fn from_registry(_registry: &StoreRegistry) -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            Counted
        }
    }

    #[test]
    fn test_same_type_same_instance() {
        let registry = StoreRegistry::new();
        let a = registry.get_instance::<KeyedStore<Teams>>();
        let b = registry.get_instance::<KeyedStore<Teams>>();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_different_types_distinct_instances() {
        let registry = StoreRegistry::new();
        let teams = registry.get_instance::<KeyedStore<Teams>>();
        let banner = registry.get_instance::<ValueStore<Banner>>();

        let teams_ptr = Arc::as_ptr(&teams) as *const ();
        let banner_ptr = Arc::as_ptr(&banner) as *const ();
        assert_ne!(teams_ptr, banner_ptr);
    }

    #[test]
    fn test_store_shares_registered_actions() {
        let registry = StoreRegistry::new();
        let store = registry.get_instance::<KeyedStore<Teams>>();
        let actions = registry.get_instance::<KeyedActions<Teams>>();

        assert!(Arc::ptr_eq(store.actions(), &actions));
        // store + its actions
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_constructed_once() {
        let registry = StoreRegistry::new();
        let before = CONSTRUCTED.load(Ordering::SeqCst);
        registry.get_instance::<Counted>();
        registry.get_instance::<Counted>();
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst) - before, 1);
        assert!(registry.contains::<Counted>());
    }

    #[test]
    fn test_register_prebuilt() {
        let registry = StoreRegistry::new();
        let actions = Arc::new(KeyedActions::<Teams>::new());

        assert!(registry.register(Arc::clone(&actions)));
        assert!(!registry.register(Arc::new(KeyedActions::<Teams>::new())));

        let store = registry.get_instance::<KeyedStore<Teams>>();
        assert!(Arc::ptr_eq(store.actions(), &actions));
    }

    #[test]
    fn test_registries_are_independent() {
        let first = StoreRegistry::new();
        let second = StoreRegistry::new();
        let a = first.get_instance::<KeyedStore<Teams>>();
        let b = second.get_instance::<KeyedStore<Teams>>();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(second.lookup::<ValueStore<Banner>>().is_none());
    }
}
