use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use crate::types::{PageRequest, Pagination};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserPreferences {
    pub default_assistant_id: i64,
    pub theme: String,
    pub custom: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    pub groups: Vec<String>,
    pub preferences: Option<UserPreferences>,
    pub is_active: bool,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
    pub last_login: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListUsersParams {
    pub page: PageRequest,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserList {
    pub users: Vec<User>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
}

impl ApiClient {
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/users/me", &QueryParams::new()).await
    }

    pub async fn update_current_user(&self, request: &UpdateUserRequest) -> Result<User, ApiError> {
        self.put_json("/users/me", request).await
    }

    pub async fn list_users(&self, params: &ListUsersParams) -> Result<UserList, ApiError> {
        let query = QueryParams::new()
            .push_opt("page", params.page.page)
            .push_opt("page_size", params.page.page_size)
            .push_opt("is_active", params.is_active);
        self.get("/users", &query).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.get(&format!("/users/{user_id}"), &QueryParams::new())
            .await
    }
}
