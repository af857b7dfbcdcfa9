/// Appwrite Databases REST backend
///
/// API Flow:
/// 1. List: GET /databases/{db}/collections/{col}/documents?queries[]=... → `{total, documents}`
/// 2. Create: POST /databases/{db}/collections/{col}/documents `{documentId, data}`
/// 3. Update: PATCH /databases/{db}/collections/{col}/documents/{id} `{data}`
/// 4. Delete: DELETE /databases/{db}/collections/{col}/documents/{id} → 204
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{CollectionRef, Document, DocumentStore, Fields, Query};
use crate::error::{AppError, AppResult};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[allow(dead_code)]
    total: u64,
    documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentRequest<'a> {
    document_id: &'a str,
    data: &'a Fields,
}

#[derive(Debug, Serialize)]
struct UpdateDocumentRequest<'a> {
    data: &'a Fields,
}

#[derive(Clone)]
pub struct AppwriteStore {
    http_client: HttpClient,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
}

impl AppwriteStore {
    pub fn new(endpoint: String, project_id: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id,
            api_key,
        }
    }

    fn documents_url(&self, collection: &CollectionRef) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, collection.database_id, collection.collection_id
        )
    }

    fn document_url(&self, collection: &CollectionRef, document_id: &str) -> String {
        format!("{}/{}", self.documents_url(collection), document_id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, url)
            .header(PROJECT_HEADER, &self.project_id);

        match &self.api_key {
            Some(key) => builder.header(KEY_HEADER, key),
            None => builder,
        }
    }

    /// Encodes queries as repeated `queries[]` parameters
    fn query_params(queries: &[Query]) -> Vec<(&'static str, String)> {
        queries
            .iter()
            .map(|query| ("queries[]", query.to_appwrite()))
            .collect()
    }

    async fn check(response: Response, context: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{}: {}", context, body)));
        }

        Err(AppError::Store(format!(
            "Appwrite returned status {} for {}: {}",
            status, context, body
        )))
    }
}

#[async_trait::async_trait]
impl DocumentStore for AppwriteStore {
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> AppResult<Vec<Document>> {
        let response = self
            .request(Method::GET, &self.documents_url(collection))
            .query(&Self::query_params(queries))
            .send()
            .await?;

        let list: DocumentList = Self::check(response, "list documents")
            .await?
            .json()
            .await?;

        tracing::debug!(
            collection = %collection,
            documents = list.documents.len(),
            store = "appwrite",
            "Documents listed"
        );

        Ok(list.documents)
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Fields,
    ) -> AppResult<Document> {
        let response = self
            .request(Method::POST, &self.documents_url(collection))
            .json(&CreateDocumentRequest {
                document_id,
                data: &data,
            })
            .send()
            .await?;

        let document = Self::check(response, "create document")
            .await?
            .json()
            .await?;
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Fields,
    ) -> AppResult<Document> {
        let response = self
            .request(Method::PATCH, &self.document_url(collection, document_id))
            .json(&UpdateDocumentRequest { data: &data })
            .send()
            .await?;

        let document = Self::check(response, "update document")
            .await?
            .json()
            .await?;
        Ok(document)
    }

    async fn delete_document(&self, collection: &CollectionRef, document_id: &str) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, &self.document_url(collection, document_id))
            .send()
            .await?;

        Self::check(response, "delete document").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "appwrite"
    }
}
