use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::media::{MovieId, StoreError, TrendingEntry};
use crate::settings::AppSettings;

/// How many ranked entries the trending view shows.
pub const TRENDING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrendingEntry {
    pub search_term: String,
    pub movie_id: MovieId,
    pub poster_url: String,
}

/// Shared document store holding one counter document per distinct search
/// term. The store itself ranks by count; clients never re-sort.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn find_by_search_term(&self, term: &str) -> Result<Option<TrendingEntry>, StoreError>;
    /// The store has no atomic increment; the caller passes the count it
    /// just read and the new value is written as `current_count + 1`.
    async fn increment_count(
        &self,
        document_id: &str,
        current_count: u32,
    ) -> Result<(), StoreError>;
    async fn create_entry(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, StoreError>;
    async fn list_all(&self) -> Result<Vec<TrendingEntry>, StoreError>;
}

#[derive(Deserialize)]
struct DocumentList {
    documents: Vec<TrendingEntry>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn equal_query(attribute: &str, value: &str) -> String {
    json!({"method": "equal", "attribute": attribute, "values": [value]}).to_string()
}

fn order_desc_query(attribute: &str) -> String {
    json!({"method": "orderDesc", "attribute": attribute}).to_string()
}

fn limit_query(limit: usize) -> String {
    json!({"method": "limit", "values": [limit]}).to_string()
}

#[derive(Clone)]
pub struct CounterStoreClient {
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
    database_id: String,
    collection_id: String,
    http_client: reqwest::Client,
}

impl CounterStoreClient {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            endpoint: settings.store_endpoint.clone(),
            project_id: settings.store_project_id.clone(),
            api_key: settings.store_api_key.clone(),
            database_id: settings.store_database_id.clone(),
            collection_id: settings.store_collection_id.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn document_url(&self, document_id: &str) -> String {
        format!("{}/{}", self.documents_url(), document_id)
    }

    fn apply_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("X-Appwrite-Project", &self.project_id)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = self
            .apply_headers(builder)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status < 400 {
            return Ok(response);
        }
        if let Ok(body) = response.json::<ErrorBody>().await {
            if let Some(message) = body.message {
                return Err(StoreError::Api { message });
            }
        }
        Err(StoreError::Network(format!("HTTP error: {}", status)))
    }

    async fn fetch_documents(&self, queries: &[String]) -> Result<Vec<TrendingEntry>, StoreError> {
        let params: Vec<(&str, &str)> = queries
            .iter()
            .map(|query| ("queries[]", query.as_str()))
            .collect();
        let builder = self.http_client.get(self.documents_url()).query(&params);
        let list: DocumentList = self
            .send(builder)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(list.documents)
    }
}

#[async_trait]
impl CounterStore for CounterStoreClient {
    async fn find_by_search_term(&self, term: &str) -> Result<Option<TrendingEntry>, StoreError> {
        let queries = [equal_query("searchTerm", term), limit_query(1)];
        let documents = self.fetch_documents(&queries).await?;
        Ok(documents.into_iter().next())
    }

    async fn increment_count(
        &self,
        document_id: &str,
        current_count: u32,
    ) -> Result<(), StoreError> {
        let body = json!({"data": {"count": current_count + 1}});
        let builder = self
            .http_client
            .patch(self.document_url(document_id))
            .json(&body);
        self.send(builder).await?;
        Ok(())
    }

    async fn create_entry(&self, entry: NewTrendingEntry) -> Result<TrendingEntry, StoreError> {
        let body = json!({
            "documentId": "unique()",
            "data": {
                "searchTerm": entry.search_term,
                "count": 1,
                "movie_id": entry.movie_id,
                "poster_url": entry.poster_url,
            }
        });
        let builder = self.http_client.post(self.documents_url()).json(&body);
        self.send(builder)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<TrendingEntry>, StoreError> {
        let queries = [order_desc_query("count"), limit_query(TRENDING_LIMIT)];
        self.fetch_documents(&queries).await
    }
}
