use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use crate::types::{ActionResult, PageRequest, Pagination};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConnectorType {
    #[serde(rename = "CONNECTOR_TYPE_TEAMS")]
    Teams,
    #[serde(rename = "CONNECTOR_TYPE_GOOGLE_DRIVE")]
    GoogleDrive,
    #[serde(rename = "CONNECTOR_TYPE_ONEDRIVE")]
    OneDrive,
    #[serde(rename = "CONNECTOR_TYPE_WEB")]
    Web,
    #[serde(rename = "CONNECTOR_TYPE_FILE")]
    File,
    #[serde(rename = "CONNECTOR_TYPE_GMAIL")]
    Gmail,
    #[serde(rename = "CONNECTOR_TYPE_GOOGLE_CALENDAR")]
    GoogleCalendar,
    #[serde(rename = "CONNECTOR_TYPE_GOOGLE_CONTACTS")]
    GoogleContacts,
    #[default]
    #[serde(rename = "CONNECTOR_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

impl ConnectorType {
    pub const ALL: [ConnectorType; 8] = [
        Self::Teams,
        Self::GoogleDrive,
        Self::OneDrive,
        Self::Web,
        Self::File,
        Self::Gmail,
        Self::GoogleCalendar,
        Self::GoogleContacts,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "CONNECTOR_TYPE_UNSPECIFIED",
            Self::Teams => "CONNECTOR_TYPE_TEAMS",
            Self::GoogleDrive => "CONNECTOR_TYPE_GOOGLE_DRIVE",
            Self::OneDrive => "CONNECTOR_TYPE_ONEDRIVE",
            Self::Web => "CONNECTOR_TYPE_WEB",
            Self::File => "CONNECTOR_TYPE_FILE",
            Self::Gmail => "CONNECTOR_TYPE_GMAIL",
            Self::GoogleCalendar => "CONNECTOR_TYPE_GOOGLE_CALENDAR",
            Self::GoogleContacts => "CONNECTOR_TYPE_GOOGLE_CONTACTS",
        }
    }

    /// Short lowercase name used on the command line, e.g. `google-drive`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Teams => "teams",
            Self::GoogleDrive => "google-drive",
            Self::OneDrive => "onedrive",
            Self::Web => "web",
            Self::File => "file",
            Self::Gmail => "gmail",
            Self::GoogleCalendar => "google-calendar",
            Self::GoogleContacts => "google-contacts",
        }
    }
}

impl std::str::FromStr for ConnectorType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == value || kind.as_str() == value)
            .ok_or_else(|| format!("unknown connector type '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectorStatus {
    #[serde(rename = "CONNECTOR_STATUS_PENDING")]
    Pending,
    #[serde(rename = "CONNECTOR_STATUS_SYNCING")]
    Syncing,
    #[serde(rename = "CONNECTOR_STATUS_ACTIVE")]
    Active,
    #[serde(rename = "CONNECTOR_STATUS_ERROR")]
    Error,
    #[serde(rename = "CONNECTOR_STATUS_DISABLED")]
    Disabled,
    #[default]
    #[serde(rename = "CONNECTOR_STATUS_UNSPECIFIED", other)]
    Unspecified,
}

impl ConnectorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "CONNECTOR_STATUS_UNSPECIFIED",
            Self::Pending => "CONNECTOR_STATUS_PENDING",
            Self::Syncing => "CONNECTOR_STATUS_SYNCING",
            Self::Active => "CONNECTOR_STATUS_ACTIVE",
            Self::Error => "CONNECTOR_STATUS_ERROR",
            Self::Disabled => "CONNECTOR_STATUS_DISABLED",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectorScope {
    #[serde(rename = "CONNECTOR_SCOPE_USER")]
    User,
    #[serde(rename = "CONNECTOR_SCOPE_GROUP")]
    Group,
    #[serde(rename = "CONNECTOR_SCOPE_ORG")]
    Org,
    #[default]
    #[serde(rename = "CONNECTOR_SCOPE_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Connector {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    pub config: Option<Map<String, Value>>,
    pub state: Option<Map<String, Value>>,
    pub refresh_freq_minutes: u32,
    pub user_id: i64,
    pub scope: ConnectorScope,
    pub scope_id: String,
    pub status: ConnectorStatus,
    pub status_message: String,
    pub last_sync_at: Option<String>,
    pub docs_analyzed: u64,
    pub creation_date: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListConnectorsParams {
    pub page: PageRequest,
    pub connector_type: Option<ConnectorType>,
    pub status: Option<ConnectorStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectorList {
    pub connectors: Vec<Connector>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateConnectorRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_freq_minutes: Option<u32>,
    pub scope: ConnectorScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateConnectorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_freq_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ConnectorScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectorSyncStatus {
    pub status: ConnectorStatus,
    pub status_message: String,
    pub last_sync_at: Option<String>,
    pub docs_analyzed: u64,
    pub docs_pending: u64,
}

impl ApiClient {
    pub async fn list_connectors(
        &self,
        params: &ListConnectorsParams,
    ) -> Result<ConnectorList, ApiError> {
        let query = QueryParams::new()
            .push_opt("page", params.page.page)
            .push_opt("page_size", params.page.page_size)
            .push_opt("type", params.connector_type.map(ConnectorType::as_str))
            .push_opt("status", params.status.map(ConnectorStatus::as_str));
        self.get("/connectors", &query).await
    }

    pub async fn get_connector(&self, connector_id: i64) -> Result<Connector, ApiError> {
        self.get(&format!("/connectors/{connector_id}"), &QueryParams::new())
            .await
    }

    pub async fn create_connector(
        &self,
        request: &CreateConnectorRequest,
    ) -> Result<Connector, ApiError> {
        self.post_json("/connectors", request).await
    }

    pub async fn update_connector(
        &self,
        connector_id: i64,
        request: &UpdateConnectorRequest,
    ) -> Result<Connector, ApiError> {
        self.put_json(&format!("/connectors/{connector_id}"), request)
            .await
    }

    pub async fn delete_connector(&self, connector_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/connectors/{connector_id}")).await
    }

    /// Ask the backend to schedule a sync now.
    pub async fn trigger_connector_sync(
        &self,
        connector_id: i64,
    ) -> Result<ActionResult, ApiError> {
        self.post(&format!("/connectors/{connector_id}/sync")).await
    }

    pub async fn connector_status(
        &self,
        connector_id: i64,
    ) -> Result<ConnectorSyncStatus, ApiError> {
        self.get(
            &format!("/connectors/{connector_id}/status"),
            &QueryParams::new(),
        )
        .await
    }
}
