use crate::client::ApiClient;
use crate::connectors::{Connector, ConnectorScope, ConnectorType, CreateConnectorRequest};
use crate::error::ApiError;
use crate::google::{GoogleService, LinkError, LinkOutcome, OAuthCoordinator};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub const DEFAULT_REFRESH_MINUTES: u32 = 60;

const OAUTH_NOT_CONFIGURED: &str = "Google OAuth is not configured on the server";

/// What the user has filled in so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorDraft {
    pub name: String,
    pub connector_type: ConnectorType,
    /// Shared drive to index; empty means "My Drive".
    pub drive_id: Option<String>,
}

impl ConnectorDraft {
    pub fn new(name: impl Into<String>, connector_type: ConnectorType) -> Self {
        Self {
            name: name.into(),
            connector_type,
            drive_id: None,
        }
    }

    pub fn drive_id(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = Some(drive_id.into());
        self
    }

    fn config(&self) -> Map<String, Value> {
        let mut config = Map::new();
        if self.connector_type == ConnectorType::GoogleDrive {
            if let Some(drive_id) = self.drive_id.as_deref().map(str::trim) {
                if !drive_id.is_empty() {
                    config.insert("drive_id".to_string(), Value::String(drive_id.to_string()));
                }
            }
        }
        config
    }
}

/// Google service a connector type depends on, if any.
pub fn google_service_for(connector_type: ConnectorType) -> Option<GoogleService> {
    match connector_type {
        ConnectorType::GoogleDrive => Some(GoogleService::Drive),
        ConnectorType::Gmail => Some(GoogleService::Gmail),
        ConnectorType::GoogleCalendar => Some(GoogleService::Calendar),
        ConnectorType::GoogleContacts => Some(GoogleService::Contacts),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleReadiness {
    NotRequired,
    /// The server has no Google OAuth credentials; an administrator must act.
    Unavailable(String),
    NeedsAuthorization(GoogleService),
    Authorized { email: Option<String> },
}

impl GoogleReadiness {
    pub fn allows_submit(&self) -> bool {
        matches!(self, Self::NotRequired | Self::Authorized { .. })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
    #[error("Please enter a connector name")]
    MissingName,
    #[error("Please connect your Google account for {0} before creating this connector")]
    GoogleNotAuthorized(GoogleService),
    #[error("{0}")]
    GoogleUnavailable(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Gates connector creation on the matching Google grant.
#[derive(Clone)]
pub struct ConnectorSetup {
    client: ApiClient,
    oauth: OAuthCoordinator,
}

impl ConnectorSetup {
    pub fn new(client: ApiClient, oauth: OAuthCoordinator) -> Self {
        Self { client, oauth }
    }

    pub async fn readiness(&self, draft: &ConnectorDraft) -> Result<GoogleReadiness, ApiError> {
        let Some(service) = google_service_for(draft.connector_type) else {
            return Ok(GoogleReadiness::NotRequired);
        };

        let configured = self.client.check_google_oauth_configured().await;
        if !configured.configured {
            let message = configured
                .message
                .unwrap_or_else(|| OAUTH_NOT_CONFIGURED.to_string());
            debug!(%service, %message, "Google OAuth unavailable");
            return Ok(GoogleReadiness::Unavailable(message));
        }

        let status = self.client.google_auth_status().await?;
        if status.services.is_granted(service) {
            Ok(GoogleReadiness::Authorized {
                email: status.email,
            })
        } else {
            Ok(GoogleReadiness::NeedsAuthorization(service))
        }
    }

    /// Open the consent popup for `service`. A declined or abandoned popup is
    /// `success: false`, not an error.
    pub async fn authorize(&self, service: GoogleService) -> Result<LinkOutcome, LinkError> {
        self.oauth.link_service(service).await
    }

    pub async fn submit(&self, draft: &ConnectorDraft) -> Result<Connector, SetupError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(SetupError::MissingName);
        }

        match self.readiness(draft).await? {
            GoogleReadiness::NotRequired | GoogleReadiness::Authorized { .. } => {}
            GoogleReadiness::Unavailable(message) => {
                return Err(SetupError::GoogleUnavailable(message));
            }
            GoogleReadiness::NeedsAuthorization(service) => {
                return Err(SetupError::GoogleNotAuthorized(service));
            }
        }

        let request = CreateConnectorRequest {
            name: name.to_string(),
            connector_type: draft.connector_type,
            config: Some(draft.config()),
            refresh_freq_minutes: Some(DEFAULT_REFRESH_MINUTES),
            scope: ConnectorScope::User,
            scope_id: None,
        };
        let connector = self.client.create_connector(&request).await?;
        info!(
            connector_id = connector.id,
            connector_type = draft.connector_type.as_str(),
            "connector created"
        );
        Ok(connector)
    }
}
