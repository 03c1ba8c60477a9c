use super::file::UploadFile;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use std::sync::Arc;
use tracing::debug;

pub const CHUNK_SIZE: usize = 64 * 1024;

/// Receives upload progress as a whole percentage.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Storage answered with a non-2xx status.
    #[error("Upload failed with status {status}")]
    Rejected { status: u16 },
    /// No response at all.
    #[error("Upload failed")]
    Unreachable { reason: String },
}

/// Converts byte counts into monotonic percentages for a [`ProgressCallback`].
#[derive(Clone, Default)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    last: Arc<Mutex<Option<u8>>>,
}

impl ProgressReporter {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// Ignored when `total` is zero; lower-than-seen values are dropped.
    pub fn report(&self, loaded: u64, total: u64) {
        if total == 0 {
            return;
        }
        let percent = ((loaded as f64 / total as f64) * 100.0).round().min(100.0) as u8;
        self.emit(percent);
    }

    /// Like [`report`](Self::report), but never reaches 100: bytes handed to
    /// the connection are not yet accepted by storage.
    pub fn report_in_flight(&self, loaded: u64, total: u64) {
        if total == 0 {
            return;
        }
        let percent = ((loaded as f64 / total as f64) * 100.0).round().min(99.0) as u8;
        self.emit(percent);
    }

    /// Emit the closing 100 unless it was already reported.
    pub fn finish(&self) {
        self.emit(100);
    }

    pub fn last(&self) -> Option<u8> {
        *self.last.lock()
    }

    fn emit(&self, percent: u8) {
        let mut last = self.last.lock();
        if last.is_some_and(|previous| percent <= previous) {
            return;
        }
        *last = Some(percent);
        if let Some(callback) = &self.callback {
            callback(percent);
        }
    }
}

#[async_trait]
pub trait StorageTransfer: Send + Sync {
    async fn put(
        &self,
        upload_url: &str,
        file: &UploadFile,
        progress: &ProgressReporter,
    ) -> Result<(), TransferError>;
}

/// Streams the file in [`CHUNK_SIZE`] pieces, reporting each piece as it is
/// handed to the connection. Sends no EchoMind credentials and stops short of
/// 100; the caller finishes the reporter once storage accepts the body.
#[derive(Clone, Default)]
pub struct HttpTransfer {
    http: Client,
}

impl HttpTransfer {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl StorageTransfer for HttpTransfer {
    async fn put(
        &self,
        upload_url: &str,
        file: &UploadFile,
        progress: &ProgressReporter,
    ) -> Result<(), TransferError> {
        debug!(file = %file.name, size = file.size(), "starting storage transfer");
        let response = self
            .http
            .put(upload_url)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .header(CONTENT_LENGTH, file.size())
            .body(progress_body(file.data.clone(), progress.clone()))
            .send()
            .await
            .map_err(|err| TransferError::Unreachable {
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

fn progress_body(data: Bytes, progress: ProgressReporter) -> Body {
    let total = data.len() as u64;
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
        .collect();
    let mut sent = 0u64;
    let chunks = stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress.report_in_flight(sent, total);
        Ok::<Bytes, std::io::Error>(chunk)
    });
    Body::wrap_stream(chunks)
}
