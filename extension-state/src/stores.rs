//! Concrete stores for work item tracking extensions
//!
//! Each store is a generic flux-store kind named by a `StoreDefinition`
//! marker, so the registry holds exactly one instance of each.

use std::cmp::Ordering;

use flux_store::{
    compare_ignore_case, CollectionItem, CollectionStore, KeyedStore, Store, StoreDefinition,
    ValueStore,
};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{Document, GitRepository, WebApiTeam, WorkItemField, WorkItemTemplate, WorkItemType};

macro_rules! store_definition {
    ($(#[$meta:meta])* $marker:ident, $key:literal, $item:ty) => {
        $(#[$meta])*
        pub struct $marker;

        impl StoreDefinition for $marker {
            const KEY: &'static str = $key;
            type Item = $item;
        }
    };
}

store_definition!(
    /// Teams per project
    Teams, "TeamStore", Vec<WebApiTeam>
);
store_definition!(GitRepos, "GitRepoStore", GitRepository);
store_definition!(WorkItemFields, "WorkItemFieldStore", WorkItemField);
store_definition!(WorkItemTypes, "WorkItemTypeStore", WorkItemType);
store_definition!(
    /// Template references per team
    WorkItemTemplates, "WorkItemTemplateStore", Vec<WorkItemTemplate>
);
store_definition!(
    /// Full templates per template id
    WorkItemTemplateItems, "WorkItemTemplateItemStore", WorkItemTemplate
);
store_definition!(
    /// Setting documents per setting id
    Settings, "SettingsStore", Document
);
store_definition!(ErrorMessages, "ErrorMessageStore", String);

pub type TeamStore = KeyedStore<Teams>;
pub type GitRepoStore = CollectionStore<GitRepos>;
pub type WorkItemFieldStore = CollectionStore<WorkItemFields>;
pub type WorkItemTypeStore = CollectionStore<WorkItemTypes>;
pub type WorkItemTemplateStore = KeyedStore<WorkItemTemplates>;
pub type WorkItemTemplateItemStore = KeyedStore<WorkItemTemplateItems>;
pub type SettingsStore = KeyedStore<Settings>;
pub type ErrorMessageStore = ValueStore<ErrorMessages>;

/// Typed reads of cached setting documents
pub trait SettingsStoreExt {
    /// Decode the cached value of setting `key`
    ///
    /// `Ok(None)` when the setting has not been loaded.
    fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Concurrency token of the cached document, 0 when never saved
    fn setting_etag(&self, key: &str) -> i64;
}

impl SettingsStoreExt for SettingsStore {
    fn get_setting<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key) {
            Some(document) => Ok(Some(serde_json::from_value(document.value)?)),
            None => Ok(None),
        }
    }

    fn setting_etag(&self, key: &str) -> i64 {
        self.get_item(key).map_or(0, |document| document.etag)
    }
}

/// Stable, case-insensitive sort by display name
pub fn sort_by_display_name<T: CollectionItem>(items: &mut [T]) {
    items.sort_by(|a, b| by_display_name(a, b));
}

fn by_display_name<T: CollectionItem>(a: &T, b: &T) -> Ordering {
    compare_ignore_case(a.display_name(), b.display_name())
}
