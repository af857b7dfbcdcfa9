//! Document store abstraction
//!
//! The hosted backend exposes schemaless collections of JSON documents. Everything above this
//! module works with typed records; `Document::decode` is the one place loosely typed fields are
//! validated and defaulted.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};

pub mod appwrite;
pub mod memory;

pub use appwrite::AppwriteStore;
pub use memory::MemoryStore;

/// Field map of a document, without the `$`-prefixed system attributes
pub type Fields = Map<String, Value>;

/// Identifies a collection inside a database
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub database_id: String,
    pub collection_id: String,
}

impl CollectionRef {
    pub fn new(database_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl std::fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.database_id, self.collection_id)
    }
}

/// A stored document as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: Fields,
}

impl Document {
    /// Maps the document onto a typed record, system attributes included
    pub fn decode<T: DeserializeOwned>(self) -> AppResult<T> {
        let id = self.id.clone();
        let value = serde_json::to_value(self)
            .map_err(|e| AppError::Internal(format!("Document serialization error: {}", e)))?;

        serde_json::from_value(value).map_err(|e| {
            AppError::Store(format!(
                "Malformed {} document {}: {}",
                std::any::type_name::<T>().rsplit("::").next().unwrap_or("record"),
                id,
                e
            ))
        })
    }

    /// Looks up a field, treating `$id`/`$createdAt`/`$updatedAt` as regular attributes
    pub fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "$id" => Some(Value::String(self.id.clone())),
            "$createdAt" => Some(Value::String(self.created_at.to_rfc3339())),
            "$updatedAt" => Some(Value::String(self.updated_at.to_rfc3339())),
            _ => self.data.get(name).cloned(),
        }
    }
}

/// Converts a typed payload into the field map a create/update call expects
pub fn to_fields<T: Serialize>(payload: &T) -> AppResult<Fields> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(AppError::Internal(format!(
            "Document payload must be an object, got {}",
            other
        ))),
        Err(e) => Err(AppError::Internal(format!(
            "Document serialization error: {}",
            e
        ))),
    }
}

/// Generates a fresh document id
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// List filters, orderings and limits understood by every store
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals the given value
    Equal(String, Value),
    /// Sort by attribute, largest first
    OrderDesc(String),
    /// Return at most this many documents
    Limit(usize),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal(attribute.into(), value.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc(attribute.into())
    }

    pub fn limit(limit: usize) -> Self {
        Query::Limit(limit)
    }

    /// JSON encoding used by the Appwrite `queries[]` parameter
    pub fn to_appwrite(&self) -> String {
        let encoded = match self {
            Query::Equal(attribute, value) => {
                json!({ "method": "equal", "attribute": attribute, "values": [value] })
            }
            Query::OrderDesc(attribute) => json!({ "method": "orderDesc", "attribute": attribute }),
            Query::Limit(limit) => json!({ "method": "limit", "values": [limit] }),
        };
        encoded.to_string()
    }
}

/// Trait for document store backends
///
/// Every method is a single request/response round trip. No retries and no transactions: callers
/// that need check-then-act sequences serialize them themselves.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists documents matching all `Equal` filters, ordered and limited as requested
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> AppResult<Vec<Document>>;

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Fields,
    ) -> AppResult<Document>;

    /// Merges `data` into an existing document
    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Fields,
    ) -> AppResult<Document>;

    async fn delete_document(&self, collection: &CollectionRef, document_id: &str)
        -> AppResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
