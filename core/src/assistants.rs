use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use crate::types::{PageRequest, Pagination};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Assistant {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub llm_id: i64,
    pub system_prompt: String,
    pub task_prompt: String,
    pub starter_messages: Vec<String>,
    pub is_default: bool,
    pub is_visible: bool,
    pub display_priority: i32,
    pub created_by: i64,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListAssistantsParams {
    pub page: PageRequest,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantList {
    pub assistants: Vec<Assistant>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateAssistantRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub llm_id: i64,
    pub system_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_messages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_priority: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateAssistantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_messages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_priority: Option<i32>,
}

impl ApiClient {
    pub async fn list_assistants(
        &self,
        params: &ListAssistantsParams,
    ) -> Result<AssistantList, ApiError> {
        let query = QueryParams::new()
            .push_opt("page", params.page.page)
            .push_opt("page_size", params.page.page_size)
            .push_opt("is_visible", params.is_visible);
        self.get("/assistants", &query).await
    }

    pub async fn get_assistant(&self, assistant_id: i64) -> Result<Assistant, ApiError> {
        self.get(&format!("/assistants/{assistant_id}"), &QueryParams::new())
            .await
    }

    pub async fn create_assistant(
        &self,
        request: &CreateAssistantRequest,
    ) -> Result<Assistant, ApiError> {
        self.post_json("/assistants", request).await
    }

    pub async fn update_assistant(
        &self,
        assistant_id: i64,
        request: &UpdateAssistantRequest,
    ) -> Result<Assistant, ApiError> {
        self.put_json(&format!("/assistants/{assistant_id}"), request)
            .await
    }

    pub async fn delete_assistant(&self, assistant_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/assistants/{assistant_id}")).await
    }
}
