//! Documents persisted through the host's document service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who a document is visible to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentScope {
    /// Every user of the project collection
    #[default]
    Shared,
    /// The current user only
    User,
}

impl DocumentScope {
    pub fn is_private(self) -> bool {
        matches!(self, DocumentScope::User)
    }
}

/// A stored document: an id, a concurrency token and an arbitrary JSON value
///
/// `etag` 0 means the document has never been saved. A write carrying an
/// etag that differs from the stored one is rejected by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "__etag", default)]
    pub etag: i64,
    #[serde(default)]
    pub value: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, value: Value) -> Self {
        Self {
            id: id.into(),
            etag: 0,
            value,
        }
    }

    pub fn with_etag(mut self, etag: i64) -> Self {
        self.etag = etag;
        self
    }

    pub fn is_new(&self) -> bool {
        self.etag == 0
    }
}
