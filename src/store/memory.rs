//! In-process document store
//!
//! Mirrors the list/create/update/delete semantics of the hosted backend closely enough for tests
//! and for running the service without a backend (`STORE_BACKEND=memory`). Nothing is persisted.

use chrono::Utc;
use serde_json::Value;
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering as AtomicOrdering},
        Arc,
    },
};
use tokio::sync::RwLock;

use super::{CollectionRef, Document, DocumentStore, Fields, Query};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
struct StoredDocument {
    /// Insertion sequence, breaks ties between equal creation timestamps
    sequence: u64,
    document: Document,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<CollectionRef, Vec<StoredDocument>>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection
    pub async fn len(&self, collection: &CollectionRef) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &CollectionRef) -> bool {
        self.len(collection).await == 0
    }

    fn matches(stored: &StoredDocument, queries: &[Query]) -> bool {
        queries.iter().all(|query| match query {
            Query::Equal(attribute, expected) => {
                stored.document.attribute(attribute).as_ref() == Some(expected)
            }
            Query::OrderDesc(_) | Query::Limit(_) => true,
        })
    }

    fn compare_desc(a: &StoredDocument, b: &StoredDocument, attribute: &str) -> Ordering {
        let ordering = match attribute {
            "$createdAt" => a
                .document
                .created_at
                .cmp(&b.document.created_at)
                .then(a.sequence.cmp(&b.sequence)),
            "$updatedAt" => a.document.updated_at.cmp(&b.document.updated_at),
            _ => compare_values(
                a.document.data.get(attribute),
                b.document.data.get(attribute),
            ),
        };
        ordering.reverse()
    }
}

/// Orders numbers numerically and strings lexically; missing values sort lowest
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, Some(_)) => Ordering::Less,
        (Some(_), Some(Value::Null) | None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut matched: Vec<&StoredDocument> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| Self::matches(doc, queries)).collect())
            .unwrap_or_default();

        for query in queries {
            if let Query::OrderDesc(attribute) = query {
                matched.sort_by(|a, b| Self::compare_desc(a, b, attribute));
            }
        }

        let limit = queries
            .iter()
            .filter_map(|query| match query {
                Query::Limit(limit) => Some(*limit),
                _ => None,
            })
            .min()
            .unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .take(limit)
            .map(|stored| stored.document.clone())
            .collect())
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Fields,
    ) -> AppResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.clone()).or_default();

        if docs.iter().any(|stored| stored.document.id == document_id) {
            return Err(AppError::Store(format!(
                "Document with the requested ID already exists: {}",
                document_id
            )));
        }

        let now = Utc::now();
        let document = Document {
            id: document_id.to_string(),
            created_at: now,
            updated_at: now,
            data,
        };

        docs.push(StoredDocument {
            sequence: self.sequence.fetch_add(1, AtomicOrdering::SeqCst),
            document: document.clone(),
        });

        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Fields,
    ) -> AppResult<Document> {
        let mut collections = self.collections.write().await;
        let stored = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|stored| stored.document.id == document_id))
            .ok_or_else(|| {
                AppError::NotFound(format!("Document {} in {}", document_id, collection))
            })?;

        stored.document.data.extend(data);
        stored.document.updated_at = Utc::now();

        Ok(stored.document.clone())
    }

    async fn delete_document(&self, collection: &CollectionRef, document_id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.get_mut(collection).ok_or_else(|| {
            AppError::NotFound(format!("Document {} in {}", document_id, collection))
        })?;

        let before = docs.len();
        docs.retain(|stored| stored.document.id != document_id);

        if docs.len() == before {
            return Err(AppError::NotFound(format!(
                "Document {} in {}",
                document_id, collection
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
