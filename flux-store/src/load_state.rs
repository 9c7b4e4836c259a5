//! Per-key load-state tracking
//!
//! Each key (or the whole store, addressed with `None`) carries two
//! independent flags: `loading` is set strictly between `set_loading(true)`
//! and the next `set_loading(false)`; `loaded` is set once a load payload has
//! been applied, whether or not that payload was empty.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::key::NormalizedKey;

/// Derived tri-state view of a key's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LoadFlags {
    loading: bool,
    loaded: bool,
}

/// Load flags for every key a store has seen
#[derive(Debug, Default)]
pub struct LoadStateTable {
    flags: RwLock<HashMap<Option<NormalizedKey>, LoadFlags>>,
}

impl LoadStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&self, loading: bool, key: Option<&NormalizedKey>) {
        self.flags.write().entry(key.cloned()).or_default().loading = loading;
    }

    /// Set `loading` only if it was not already set
    ///
    /// Returns `false` when a load for `key` is already in flight.
    pub fn try_begin_loading(&self, key: Option<&NormalizedKey>) -> bool {
        let mut flags = self.flags.write();
        let entry = flags.entry(key.cloned()).or_default();
        if entry.loading {
            false
        } else {
            entry.loading = true;
            true
        }
    }

    pub fn set_loaded(&self, loaded: bool, key: Option<&NormalizedKey>) {
        self.flags.write().entry(key.cloned()).or_default().loaded = loaded;
    }

    pub fn is_loading(&self, key: Option<&NormalizedKey>) -> bool {
        self.get(key).loading
    }

    pub fn is_loaded(&self, key: Option<&NormalizedKey>) -> bool {
        self.get(key).loaded
    }

    /// Tri-state view; an in-flight reload of a loaded key reports `Loading`
    pub fn state(&self, key: Option<&NormalizedKey>) -> LoadState {
        let flags = self.get(key);
        if flags.loading {
            LoadState::Loading
        } else if flags.loaded {
            LoadState::Loaded
        } else {
            LoadState::NotLoaded
        }
    }

    /// Forget the flags of a single key
    pub fn remove(&self, key: Option<&NormalizedKey>) {
        self.flags.write().remove(&key.cloned());
    }

    /// Return every key to `NotLoaded`
    ///
    /// This also clears `loading` for fetches still in flight, so a load
    /// started after the reset fetches again. The earlier fetch still
    /// announces its payload when it completes, and its guard later clears
    /// `loading` for the key.
    pub fn reset(&self) {
        self.flags.write().clear();
    }

    fn get(&self, key: Option<&NormalizedKey>) -> LoadFlags {
        self.flags
            .read()
            .get(&key.cloned())
            .copied()
            .unwrap_or_default()
    }
}
