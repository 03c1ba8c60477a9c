pub mod coordinator;
pub mod file;
pub mod transfer;

use crate::client::ApiClient;
use crate::documents::Document;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use coordinator::{ProgressCallback, UploadCoordinator, UploadError, UploadOptions};
pub use file::UploadFile;
pub use transfer::{HttpTransfer, ProgressReporter, StorageTransfer, TransferError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitiateUploadRequest {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_id: Option<i64>,
}

/// A backend-issued upload session. `expires_at` is passed through as-is;
/// the storage host enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitiateUploadResponse {
    pub upload_id: String,
    pub upload_url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompleteUploadRequest {
    pub upload_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbortUploadRequest {
    pub upload_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbortUploadResponse {
    #[serde(default)]
    pub message: String,
    pub upload_id: String,
}

impl ApiClient {
    pub async fn initiate_upload(
        &self,
        request: &InitiateUploadRequest,
    ) -> Result<InitiateUploadResponse, ApiError> {
        self.post_json("/upload/initiate", request).await
    }

    pub async fn complete_upload(
        &self,
        request: &CompleteUploadRequest,
    ) -> Result<Document, ApiError> {
        self.post_json("/upload/complete", request).await
    }

    /// Cancel a session that will not be completed. Never issued automatically.
    pub async fn abort_upload(&self, upload_id: &str) -> Result<AbortUploadResponse, ApiError> {
        let request = AbortUploadRequest {
            upload_id: upload_id.to_string(),
        };
        self.post_json("/upload/abort", &request).await
    }
}
