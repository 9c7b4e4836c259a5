//! Action creators: fetch from a service, then announce through a store's actions
//!
//! Every `initialize_*` call follows the same protocol per resource key:
//!
//! 1. Already loaded: re-announce the cached value (a `None` payload) so
//!    views recompute, and return without fetching.
//! 2. Already loading: return immediately. The in-flight fetch announces the
//!    result when it completes.
//! 3. Otherwise mark the key loading, fetch, and announce the payload. The
//!    loading flag is cleared on every exit path, including when the returned
//!    future is dropped mid-fetch.
//!
//! Cleaning a store resets its load state, including keys still loading, so
//! an `initialize_*` call made right after a clean fetches again.

mod error_message;
mod fields;
mod repositories;
mod settings;
mod teams;
mod templates;
mod work_item_types;

use std::future::Future;

use flux_store::{CollectionItem, Store};
use tracing::{debug, warn};

use crate::error::{Result, StateError};
use crate::services::ServiceResult;
use crate::stores::sort_by_display_name;

pub use error_message::ErrorMessageActionCreator;
pub use fields::WorkItemFieldActionCreator;
pub use repositories::GitRepoActionCreator;
pub use settings::SettingsActionCreator;
pub use teams::TeamActionCreator;
pub use templates::WorkItemTemplateActionCreator;
pub use work_item_types::WorkItemTypeActionCreator;

/// Clears a key's loading flag when dropped
struct LoadingGuard<'a, S: Store> {
    store: &'a S,
    key: Option<&'a S::Key>,
}

impl<S: Store> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.store.set_loading(false, self.key);
    }
}

/// Run the load protocol for `key` of `store`
///
/// `announce` receives `None` for a cache hit and `Some(value)` after a
/// successful fetch. A failed fetch is returned as `StateError::Fetch`
/// after the loading flag has been cleared.
pub(crate) async fn load_resource<'a, S, V, F, Fut, A>(
    store: &'a S,
    key: Option<&'a S::Key>,
    fetch: F,
    announce: A,
) -> Result<()>
where
    S: Store,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ServiceResult<V>>,
    A: FnOnce(Option<V>),
{
    let store_key = store.key();

    if store.is_loaded(key) {
        debug!(store = store_key, "Cache hit, re-announcing");
        announce(None);
        return Ok(());
    }

    if !store.try_begin_loading(key) {
        debug!(store = store_key, "Load already in flight");
        return Ok(());
    }
    let guard = LoadingGuard { store, key };

    debug!(store = store_key, "Fetching");
    match fetch().await {
        Ok(value) => {
            announce(Some(value));
            drop(guard);
            Ok(())
        }
        Err(err) => {
            drop(guard);
            warn!(store = store_key, status = ?err.status, "Fetch failed: {}", err);
            Err(StateError::Fetch(err))
        }
    }
}

/// Sort `items` by display name when `enabled`
pub(crate) fn sorted<T: CollectionItem>(mut items: Vec<T>, enabled: bool) -> Vec<T> {
    if enabled {
        sort_by_display_name(&mut items);
    }
    items
}
