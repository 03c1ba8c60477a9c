use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectorScope {
    #[default]
    User,
    Team,
    Org,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectorTeamStats {
    pub team_id: i64,
    pub team_name: String,
    pub collection_name: String,
    pub vector_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectorStats {
    pub user_collection: String,
    pub user_vectors: u64,
    pub teams: Vec<ProjectorTeamStats>,
    pub org_collection: String,
    pub org_vectors: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateProjectorRequest {
    pub scope: ProjectorScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectorVisualization {
    pub viz_id: String,
    pub collection_name: String,
    pub status: String,
    pub num_points: u64,
    pub vector_dimension: u32,
    pub tensorboard_url: String,
    pub message: String,
}

impl ApiClient {
    pub async fn projector_stats(&self) -> Result<ProjectorStats, ApiError> {
        self.get("/projector/stats", &QueryParams::new()).await
    }

    pub async fn generate_projector_visualization(
        &self,
        request: &GenerateProjectorRequest,
    ) -> Result<ProjectorVisualization, ApiError> {
        self.post_json("/projector/generate", request).await
    }
}
