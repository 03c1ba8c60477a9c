pub mod bus;
pub mod link;
pub mod popup;

use crate::client::{ApiClient, QueryParams};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub use bus::{MessageBus, OAuthMessage, Subscription};
pub use link::{LinkError, LinkOutcome, OAuthCoordinator, POPUP_POLL_INTERVAL, POPUP_TIMEOUT};
pub use popup::{PopupFeatures, PopupHandle, PopupLauncher};

/// Google capabilities a user can grant to EchoMind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GoogleService {
    Drive,
    Gmail,
    Calendar,
    Contacts,
}

impl GoogleService {
    pub const ALL: [GoogleService; 4] = [Self::Drive, Self::Gmail, Self::Calendar, Self::Contacts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Gmail => "gmail",
            Self::Calendar => "calendar",
            Self::Contacts => "contacts",
        }
    }
}

impl fmt::Display for GoogleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown Google service `{0}` (expected drive, gmail, calendar or contacts)")]
pub struct UnknownService(pub String);

impl FromStr for GoogleService {
    type Err = UnknownService;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownService(value.to_string()))
    }
}

/// How the consent page should return control to the app.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Popup,
    Redirect,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popup => "popup",
            Self::Redirect => "redirect",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleServices {
    #[serde(default)]
    pub drive: bool,
    #[serde(default)]
    pub gmail: bool,
    #[serde(default)]
    pub calendar: bool,
    #[serde(default)]
    pub contacts: bool,
}

impl GoogleServices {
    pub fn is_granted(&self, service: GoogleService) -> bool {
        match service {
            GoogleService::Drive => self.drive,
            GoogleService::Gmail => self.gmail,
            GoogleService::Calendar => self.calendar,
            GoogleService::Contacts => self.contacts,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleAuthStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub granted_scopes: Vec<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub services: GoogleServices,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleAuthUrl {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoogleOAuthConfigStatus {
    pub configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GoogleOAuthConfigStatus {
    fn unavailable(message: &str) -> Self {
        Self {
            configured: false,
            message: Some(message.to_string()),
        }
    }
}

impl ApiClient {
    /// Whether the backend has Google OAuth credentials. Never fails: an
    /// unreachable or unhappy backend reads as "not configured".
    pub async fn check_google_oauth_configured(&self) -> GoogleOAuthConfigStatus {
        match self
            .get_public::<GoogleOAuthConfigStatus>("/google/auth/configured")
            .await
        {
            Ok(status) => status,
            Err(ApiError::Transport { source, .. } | ApiError::Decode { source, .. }) => {
                warn!(error = %source, "failed to check Google OAuth configuration");
                GoogleOAuthConfigStatus::unavailable("Backend not reachable")
            }
            Err(_) => GoogleOAuthConfigStatus::unavailable(
                "Unable to check Google OAuth configuration",
            ),
        }
    }

    pub async fn google_auth_status(&self) -> Result<GoogleAuthStatus, ApiError> {
        self.get("/google/auth/status", &QueryParams::new()).await
    }

    pub async fn google_auth_url(
        &self,
        service: GoogleService,
        mode: AuthMode,
    ) -> Result<GoogleAuthUrl, ApiError> {
        let query = QueryParams::new()
            .push("service", service)
            .push("mode", mode.as_str());
        self.get("/google/auth/url", &query).await
    }

    pub async fn revoke_google_auth(&self) -> Result<(), ApiError> {
        self.delete("/google/auth").await
    }
}
