use crate::client::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Empty by default, which serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchEvaluationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_messages: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BatchEvaluationSummary {
    pub evaluated: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl ApiClient {
    pub async fn run_batch_evaluation(
        &self,
        request: &BatchEvaluationRequest,
    ) -> Result<BatchEvaluationSummary, ApiError> {
        self.post_json("/evaluate/batch", request).await
    }
}
