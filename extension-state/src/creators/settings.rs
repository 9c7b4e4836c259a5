use std::sync::Arc;

use flux_store::Store;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, StateError};
use crate::model::{Document, DocumentScope};
use crate::services::DocumentService;
use crate::stores::SettingsStore;

use super::load_resource;

/// Reads and writes setting documents through the `DocumentService`
pub struct SettingsActionCreator {
    store: Arc<SettingsStore>,
    documents: Arc<dyn DocumentService>,
    collection: String,
    scope: DocumentScope,
}

impl SettingsActionCreator {
    pub fn new(store: Arc<SettingsStore>, documents: Arc<dyn DocumentService>) -> Self {
        Self {
            store,
            documents,
            collection: "Settings".to_string(),
            scope: DocumentScope::Shared,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_scope(mut self, scope: DocumentScope) -> Self {
        self.scope = scope;
        self
    }

    /// Load setting `key`; an absent document loads as `null`
    pub async fn initialize_setting(&self, key: &str) -> Result<()> {
        load_resource(
            self.store.as_ref(),
            Some(key),
            || self.documents.read(&self.collection, key, Value::Null, self.scope),
            |document| self.store.actions().loaded(key, document),
        )
        .await
    }

    /// Persist a new value for setting `key`
    ///
    /// `key` is matched case-insensitively; a cached setting is written back
    /// under its stored id with its etag. Any rejected write is reported as
    /// [`StateError::Conflict`]; the service's own error is only logged.
    pub async fn update_setting<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<Document> {
        let value = serde_json::to_value(value)?;
        let document = match self.store.get_item(key) {
            Some(cached) => Document::new(cached.id, value).with_etag(cached.etag),
            None => Document::new(key, value),
        };

        match self
            .documents
            .add_or_update(&self.collection, document, self.scope)
            .await
        {
            Ok(saved) => {
                debug!(setting = key, etag = saved.etag, "Setting saved");
                self.store.actions().loaded(key, Some(saved.clone()));
                Ok(saved)
            }
            Err(err) => {
                warn!(setting = key, status = ?err.status, "Setting write rejected: {}", err);
                Err(StateError::Conflict)
            }
        }
    }

    pub fn clean(&self) {
        self.store.actions().clean();
    }
}
