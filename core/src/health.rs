use crate::client::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Result of the web backend probing the EchoMind API.
///
/// `status` is one of `healthy`, `unhealthy`, `disabled` or `error`; the
/// optional fields depend on which.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EchomindHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echomind_api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EchomindHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ApiClient {
    pub async fn echomind_health(&self) -> Result<EchomindHealth, ApiError> {
        self.get_public("/echomind/health").await
    }
}
