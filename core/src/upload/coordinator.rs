use super::file::UploadFile;
use super::transfer::{HttpTransfer, ProgressReporter, StorageTransfer, TransferError};
use super::{AbortUploadResponse, CompleteUploadRequest, InitiateUploadRequest};
use crate::client::ApiClient;
use crate::documents::Document;
use crate::error::ApiError;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use super::transfer::ProgressCallback;

#[derive(Clone, Default)]
pub struct UploadOptions {
    pub title: Option<String>,
    pub connector_id: Option<i64>,
    pub on_progress: Option<ProgressCallback>,
}

impl UploadOptions {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn connector(mut self, connector_id: i64) -> Self {
        self.connector_id = Some(connector_id);
        self
    }

    pub fn on_progress(mut self, callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    InitiationRejected(ApiError),
    #[error("Upload failed with status {status}")]
    TransferRejected { status: u16 },
    #[error("Upload failed")]
    TransferUnreachable { reason: String },
    #[error(transparent)]
    CompletionRejected(ApiError),
}

impl UploadError {
    /// HTTP status of the failing step, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InitiationRejected(err) | Self::CompletionRejected(err) => {
                err.status().map(|status| status.as_u16())
            }
            Self::TransferRejected { status } => Some(*status),
            Self::TransferUnreachable { .. } => None,
        }
    }
}

impl From<TransferError> for UploadError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Rejected { status } => Self::TransferRejected { status },
            TransferError::Unreachable { reason } => Self::TransferUnreachable { reason },
        }
    }
}

/// `Created -> Initiated -> Transferring -> Completed`, failing out of any
/// non-terminal step. Nothing is retried or compensated: a session left behind
/// by a failed transfer stays open until aborted or expired.
#[derive(Clone)]
pub struct UploadCoordinator {
    client: ApiClient,
    transfer: Arc<dyn StorageTransfer>,
}

impl UploadCoordinator {
    pub fn new(client: ApiClient) -> Self {
        Self::with_transfer(client, Arc::new(HttpTransfer::default()))
    }

    pub fn with_transfer(client: ApiClient, transfer: Arc<dyn StorageTransfer>) -> Self {
        Self { client, transfer }
    }

    /// Deliver `file` to storage and register it as a document.
    pub async fn upload_document(
        &self,
        file: &UploadFile,
        options: UploadOptions,
    ) -> Result<Document, UploadError> {
        let request = InitiateUploadRequest {
            file_name: file.name.clone(),
            file_type: file.content_type.clone(),
            file_size: file.size(),
            connector_id: options.connector_id,
        };
        let session = self
            .client
            .initiate_upload(&request)
            .await
            .map_err(UploadError::InitiationRejected)?;
        info!(
            upload_id = %session.upload_id,
            file = %file.name,
            size = file.size(),
            expires_at = %session.expires_at,
            "upload session initiated"
        );

        let progress = ProgressReporter::new(options.on_progress.clone());
        if let Err(err) = self
            .transfer
            .put(&session.upload_url, file, &progress)
            .await
        {
            warn!(upload_id = %session.upload_id, error = %err, "storage transfer failed");
            return Err(err.into());
        }
        progress.finish();
        debug!(upload_id = %session.upload_id, "storage transfer finished");

        let document = self
            .client
            .complete_upload(&CompleteUploadRequest {
                upload_id: session.upload_id.clone(),
                title: options.title,
            })
            .await
            .map_err(UploadError::CompletionRejected)?;
        info!(
            upload_id = %session.upload_id,
            document_id = document.id,
            "upload completed"
        );
        Ok(document)
    }

    pub async fn abort(&self, upload_id: &str) -> Result<AbortUploadResponse, ApiError> {
        self.client.abort_upload(upload_id).await
    }
}
