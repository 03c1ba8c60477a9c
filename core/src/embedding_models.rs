use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbeddingModel {
    pub id: i64,
    pub model_id: String,
    pub model_name: String,
    pub model_dimension: u32,
    pub endpoint: String,
    pub is_active: bool,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbeddingModelList {
    pub models: Vec<EmbeddingModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateEmbeddingModelRequest {
    pub model_id: String,
    pub model_name: String,
    pub model_dimension: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Switching models invalidates existing vectors; `requires_reindex` and
/// `documents_affected` tell the caller how much work that implies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActivationResult {
    pub success: bool,
    pub message: String,
    pub requires_reindex: bool,
    pub documents_affected: u64,
}

impl ApiClient {
    pub async fn list_embedding_models(&self) -> Result<EmbeddingModelList, ApiError> {
        self.get("/embedding-models", &QueryParams::new()).await
    }

    pub async fn active_embedding_model(&self) -> Result<EmbeddingModel, ApiError> {
        self.get("/embedding-models/active", &QueryParams::new())
            .await
    }

    pub async fn create_embedding_model(
        &self,
        request: &CreateEmbeddingModelRequest,
    ) -> Result<EmbeddingModel, ApiError> {
        self.post_json("/embedding-models", request).await
    }

    pub async fn activate_embedding_model(
        &self,
        model_id: i64,
    ) -> Result<ActivationResult, ApiError> {
        self.put(&format!("/embedding-models/{model_id}/activate"))
            .await
    }
}
