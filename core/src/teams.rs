use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use crate::types::{PageRequest, Pagination};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TeamMemberRole {
    #[serde(rename = "TEAM_MEMBER_ROLE_MEMBER")]
    Member,
    #[serde(rename = "TEAM_MEMBER_ROLE_LEAD")]
    Lead,
    #[default]
    #[serde(rename = "TEAM_MEMBER_ROLE_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub leader_id: i64,
    pub created_by: i64,
    pub member_count: u32,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TeamMember {
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: TeamMemberRole,
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListTeamsParams {
    pub page: PageRequest,
    pub include_member_count: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TeamList {
    pub teams: Vec<Team>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddTeamMemberRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TeamMemberRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct UpdateRoleRequest {
    role: TeamMemberRole,
}

impl ApiClient {
    pub async fn list_teams(&self, params: &ListTeamsParams) -> Result<TeamList, ApiError> {
        // The flag is only ever sent switched on.
        let query = QueryParams::new()
            .push_opt("page", params.page.page)
            .push_opt("page_size", params.page.page_size)
            .push_opt("include_member_count", params.include_member_count.then_some(true));
        self.get("/teams", &query).await
    }

    /// Teams the caller belongs to.
    pub async fn my_teams(&self) -> Result<TeamList, ApiError> {
        self.get("/teams/me", &QueryParams::new()).await
    }

    pub async fn create_team(&self, request: &CreateTeamRequest) -> Result<Team, ApiError> {
        self.post_json("/teams", request).await
    }

    pub async fn get_team(&self, team_id: i64) -> Result<TeamDetail, ApiError> {
        self.get(&format!("/teams/{team_id}"), &QueryParams::new())
            .await
    }

    pub async fn update_team(
        &self,
        team_id: i64,
        request: &UpdateTeamRequest,
    ) -> Result<Team, ApiError> {
        self.put_json(&format!("/teams/{team_id}"), request).await
    }

    pub async fn delete_team(&self, team_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/teams/{team_id}")).await
    }

    pub async fn add_team_member(
        &self,
        team_id: i64,
        request: &AddTeamMemberRequest,
    ) -> Result<TeamMember, ApiError> {
        self.post_json(&format!("/teams/{team_id}/members"), request)
            .await
    }

    pub async fn remove_team_member(&self, team_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/teams/{team_id}/members/{user_id}"))
            .await
    }

    pub async fn update_team_member_role(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamMemberRole,
    ) -> Result<TeamMember, ApiError> {
        self.put_json(
            &format!("/teams/{team_id}/members/{user_id}/role"),
            &UpdateRoleRequest { role },
        )
        .await
    }
}
