use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use crate::types::{PageRequest, Pagination};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LlmProvider {
    #[serde(rename = "LLM_PROVIDER_OPENAI_COMPATIBLE")]
    OpenAiCompatible,
    #[serde(rename = "LLM_PROVIDER_ANTHROPIC")]
    Anthropic,
    /// Anthropic accessed with an OAuth token instead of an API key.
    #[serde(rename = "LLM_PROVIDER_ANTHROPIC_TOKEN")]
    AnthropicToken,
    #[default]
    #[serde(rename = "LLM_PROVIDER_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Llm {
    pub id: i64,
    pub name: String,
    pub provider: LlmProvider,
    pub model_id: String,
    pub endpoint: String,
    pub has_api_key: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub is_default: bool,
    pub is_active: bool,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListLlmsParams {
    pub page: PageRequest,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmList {
    pub llms: Vec<Llm>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateLlmRequest {
    pub name: String,
    pub provider: LlmProvider,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateLlmRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<LlmProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmTestResult {
    pub success: bool,
    pub message: String,
    pub latency_ms: u64,
}

impl ApiClient {
    pub async fn list_llms(&self, params: &ListLlmsParams) -> Result<LlmList, ApiError> {
        let query = QueryParams::new()
            .push_opt("page", params.page.page)
            .push_opt("page_size", params.page.page_size)
            .push_opt("is_active", params.is_active);
        self.get("/llms", &query).await
    }

    pub async fn get_llm(&self, llm_id: i64) -> Result<Llm, ApiError> {
        self.get(&format!("/llms/{llm_id}"), &QueryParams::new())
            .await
    }

    pub async fn create_llm(&self, request: &CreateLlmRequest) -> Result<Llm, ApiError> {
        self.post_json("/llms", request).await
    }

    pub async fn update_llm(
        &self,
        llm_id: i64,
        request: &UpdateLlmRequest,
    ) -> Result<Llm, ApiError> {
        self.put_json(&format!("/llms/{llm_id}"), request).await
    }

    pub async fn delete_llm(&self, llm_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/llms/{llm_id}")).await
    }

    /// Round-trip a probe request through the configured provider.
    pub async fn test_llm(&self, llm_id: i64) -> Result<LlmTestResult, ApiError> {
        self.post(&format!("/llms/{llm_id}/test")).await
    }
}
