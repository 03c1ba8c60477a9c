use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use crate::types::Pagination;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentStatus {
    #[serde(rename = "DOCUMENT_STATUS_PENDING")]
    Pending,
    #[serde(rename = "DOCUMENT_STATUS_PROCESSING")]
    Processing,
    #[serde(rename = "DOCUMENT_STATUS_COMPLETED")]
    Completed,
    #[serde(rename = "DOCUMENT_STATUS_FAILED")]
    Failed,
    #[default]
    #[serde(rename = "DOCUMENT_STATUS_UNSPECIFIED", other)]
    Unspecified,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "DOCUMENT_STATUS_UNSPECIFIED",
            Self::Pending => "DOCUMENT_STATUS_PENDING",
            Self::Processing => "DOCUMENT_STATUS_PROCESSING",
            Self::Completed => "DOCUMENT_STATUS_COMPLETED",
            Self::Failed => "DOCUMENT_STATUS_FAILED",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Document {
    pub id: i64,
    pub parent_id: i64,
    pub connector_id: i64,
    pub source_id: String,
    pub url: String,
    pub original_url: String,
    pub title: String,
    pub content_type: String,
    pub status: DocumentStatus,
    pub status_message: String,
    pub chunk_count: u32,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListDocumentsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub connector_id: Option<i64>,
    pub doc_status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentList {
    pub documents: Vec<Document>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone)]
pub struct DocumentSearch {
    pub query: String,
    pub connector_id: Option<i64>,
    pub limit: Option<u32>,
    pub min_score: Option<f32>,
}

impl DocumentSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            connector_id: None,
            limit: None,
            min_score: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentSearchResult {
    pub document: Document,
    pub chunk_id: String,
    pub chunk_content: String,
    pub score: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentSearchResponse {
    pub results: Vec<DocumentSearchResult>,
}

impl ApiClient {
    pub async fn list_documents(
        &self,
        params: &ListDocumentsParams,
    ) -> Result<DocumentList, ApiError> {
        let query = QueryParams::new()
            .push_opt("page", params.page)
            .push_opt("limit", params.limit)
            .push_opt("connector_id", params.connector_id)
            .push_opt("doc_status", params.doc_status.map(DocumentStatus::as_str));
        self.get("/documents", &query).await
    }

    pub async fn get_document(&self, document_id: i64) -> Result<Document, ApiError> {
        self.get(&format!("/documents/{document_id}"), &QueryParams::new())
            .await
    }

    pub async fn delete_document(&self, document_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/documents/{document_id}")).await
    }

    pub async fn search_documents(
        &self,
        search: &DocumentSearch,
    ) -> Result<DocumentSearchResponse, ApiError> {
        let query = QueryParams::new()
            .push("query", &search.query)
            .push_opt("connector_id", search.connector_id)
            .push_opt("limit", search.limit)
            .push_opt("min_score", search.min_score);
        self.get("/documents/search", &query).await
    }
}
