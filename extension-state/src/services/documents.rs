//! Document persistence

use std::collections::HashMap;

use async_trait::async_trait;
use flux_store::NormalizedKey;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use super::ServiceResult;
use crate::error::ServiceError;
use crate::model::{Document, DocumentScope};

/// Host key/value document store with optimistic concurrency
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Read document `id`, or a new document holding `default` when absent
    async fn read(
        &self,
        collection: &str,
        id: &str,
        default: Value,
        scope: DocumentScope,
    ) -> ServiceResult<Document>;

    /// Create or replace a document, returning it with its new etag
    ///
    /// Rejected when `document.etag` does not match the stored etag.
    async fn add_or_update(
        &self,
        collection: &str,
        document: Document,
        scope: DocumentScope,
    ) -> ServiceResult<Document>;
}

type DocumentKey = (DocumentScope, String, NormalizedKey);

/// Process-local `DocumentService`
///
/// Documents are partitioned by scope and collection; ids match ignoring
/// case and keep the casing of their first write. Etags start at 1 on the
/// first write and increase by one per accepted write.
#[derive(Debug, Default)]
pub struct InMemoryDocumentService {
    documents: Mutex<HashMap<DocumentKey, Document>>,
}

impl InMemoryDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across every collection
    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }

    fn key(collection: &str, id: &str, scope: DocumentScope) -> DocumentKey {
        (scope, collection.to_string(), NormalizedKey::new(id))
    }
}

#[async_trait]
impl DocumentService for InMemoryDocumentService {
    async fn read(
        &self,
        collection: &str,
        id: &str,
        default: Value,
        scope: DocumentScope,
    ) -> ServiceResult<Document> {
        let documents = self.documents.lock();
        Ok(documents
            .get(&Self::key(collection, id, scope))
            .cloned()
            .unwrap_or_else(|| Document::new(id, default)))
    }

    async fn add_or_update(
        &self,
        collection: &str,
        mut document: Document,
        scope: DocumentScope,
    ) -> ServiceResult<Document> {
        let mut documents = self.documents.lock();
        let key = Self::key(collection, &document.id, scope);
        let current = match documents.get(&key) {
            Some(stored) => {
                document.id = stored.id.clone();
                stored.etag
            }
            None => 0,
        };

        if document.etag != current {
            return Err(ServiceError::with_status(
                format!(
                    "Document {} in {} has etag {}, write carried {}",
                    document.id, collection, current, document.etag
                ),
                412,
            ));
        }

        document.etag = current + 1;
        debug!(collection, id = %document.id, etag = document.etag, "Document saved");
        documents.insert(key, document.clone());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_read_missing_returns_default() {
        let service = InMemoryDocumentService::new();
        let doc = service
            .read("Settings", "theme", json!("light"), DocumentScope::Shared)
            .await
            .unwrap();
        assert_eq!(doc.value, json!("light"));
        assert!(doc.is_new());
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let service = InMemoryDocumentService::new();
        let saved = service
            .add_or_update("Settings", Document::new("theme", json!("dark")), DocumentScope::Shared)
            .await
            .unwrap();
        assert_eq!(saved.etag, 1);

        let doc = service
            .read("Settings", "theme", Value::Null, DocumentScope::Shared)
            .await
            .unwrap();
        assert_eq!(doc, saved);
    }

    #[tokio::test]
    async fn test_stale_etag_rejected() {
        let service = InMemoryDocumentService::new();
        let first = service
            .add_or_update("Settings", Document::new("theme", json!("dark")), DocumentScope::Shared)
            .await
            .unwrap();
        service
            .add_or_update("Settings", first.clone(), DocumentScope::Shared)
            .await
            .unwrap();

        let err = service
            .add_or_update("Settings", first, DocumentScope::Shared)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_ids_match_ignoring_case() {
        let service = InMemoryDocumentService::new();
        service
            .add_or_update("Settings", Document::new("showClosed", json!(true)), DocumentScope::Shared)
            .await
            .unwrap();

        let doc = service
            .read("Settings", "SHOWCLOSED", Value::Null, DocumentScope::Shared)
            .await
            .unwrap();
        assert_eq!(doc.id, "showClosed");
        assert_eq!(doc.etag, 1);

        let saved = service
            .add_or_update("Settings", Document::new("ShowClosed", json!(false)).with_etag(1), DocumentScope::Shared)
            .await
            .unwrap();
        assert_eq!(saved.id, "showClosed");
        assert_eq!(saved.etag, 2);
        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn test_scopes_and_collections_are_separate() {
        let service = InMemoryDocumentService::new();
        service
            .add_or_update("Settings", Document::new("theme", json!("dark")), DocumentScope::User)
            .await
            .unwrap();

        let shared = service
            .read("Settings", "theme", json!("light"), DocumentScope::Shared)
            .await
            .unwrap();
        assert_eq!(shared.value, json!("light"));

        let other = service
            .read("Layouts", "theme", Value::Null, DocumentScope::User)
            .await
            .unwrap();
        assert!(other.is_new());
        assert_eq!(service.len(), 1);
    }
}
