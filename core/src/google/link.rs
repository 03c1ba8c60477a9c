use super::bus::{MessageBus, OAuthMessage, Subscription};
use super::popup::{PopupFeatures, PopupHandle, PopupLauncher};
use super::{AuthMode, GoogleService};
use crate::client::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, info, warn};

pub const POPUP_TIMEOUT: Duration = Duration::from_secs(120);
pub const POPUP_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const POPUP_TARGET: &str = "google-oauth";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkOutcome {
    pub success: bool,
    pub service: GoogleService,
}

impl LinkOutcome {
    pub fn linked(service: GoogleService) -> Self {
        Self {
            success: true,
            service,
        }
    }

    pub fn declined(service: GoogleService) -> Self {
        Self {
            success: false,
            service,
        }
    }
}

/// Failures that are not a user decision.
#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("{0}")]
    AuthUrl(#[from] ApiError),
    #[error("Popup was blocked by the browser. Please allow popups for this site.")]
    PopupBlocked,
    #[error("OAuth popup timed out")]
    TimedOut,
}

/// Popup-driven Google OAuth handshake.
///
/// `Idle -> UrlRequested -> PopupOpen -> {Succeeded | Failed | Abandoned | TimedOut}`.
/// Once the popup is open, an OAuth message, the popup closing and a fixed
/// timeout race; the first to finish settles the handshake and the bus
/// subscription is released before the outcome is returned.
#[derive(Clone)]
pub struct OAuthCoordinator {
    client: ApiClient,
    launcher: Arc<dyn PopupLauncher>,
    bus: MessageBus,
}

impl OAuthCoordinator {
    pub fn new(client: ApiClient, launcher: Arc<dyn PopupLauncher>, bus: MessageBus) -> Self {
        Self {
            client,
            launcher,
            bus,
        }
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Run one complete handshake for `service`.
    pub async fn link_service(&self, service: GoogleService) -> Result<LinkOutcome, LinkError> {
        let auth = self.client.google_auth_url(service, AuthMode::Popup).await?;
        if auth.url.trim().is_empty() {
            warn!(%service, "backend returned an empty authorization URL");
            return Ok(LinkOutcome::declined(service));
        }

        let popup = self
            .launcher
            .open(&auth.url, POPUP_TARGET, &PopupFeatures::OAUTH)
            .ok_or(LinkError::PopupBlocked)?;
        info!(%service, "consent popup opened");

        self.await_handshake(popup, service).await
    }

    /// Race phase only, for hosts that opened the popup themselves.
    pub async fn await_handshake(
        &self,
        popup: Arc<dyn PopupHandle>,
        service: GoogleService,
    ) -> Result<LinkOutcome, LinkError> {
        let mut subscription = self.bus.subscribe();

        let settled = tokio::select! {
            outcome = wait_for_message(&mut subscription, service) => Ok(outcome),
            () = wait_for_close(popup.as_ref()) => {
                debug!(%service, "consent popup closed before any message");
                Ok(LinkOutcome::declined(service))
            }
            () = sleep(POPUP_TIMEOUT) => Err(LinkError::TimedOut),
        };
        subscription.unsubscribe();

        match &settled {
            Ok(outcome) => info!(%service, success = outcome.success, "Google link settled"),
            Err(err) => warn!(%service, error = %err, "Google link failed"),
        }
        settled
    }
}

async fn wait_for_message(subscription: &mut Subscription, service: GoogleService) -> LinkOutcome {
    while let Some(message) = subscription.recv().await {
        match OAuthMessage::parse(&message) {
            Some(OAuthMessage::Success { service: granted }) if granted == service => {
                return LinkOutcome::linked(service);
            }
            Some(OAuthMessage::Success { service: granted }) => {
                debug!(%service, %granted, "ignoring OAuth success for another service");
            }
            Some(OAuthMessage::Error { error }) => {
                debug!(%service, error = %error, "consent popup reported an error");
                return LinkOutcome::declined(service);
            }
            None => {}
        }
    }
    // The subscription keeps its own sender registered, so the channel only
    // closes if the bus was torn down underneath us; leave the race to the
    // other branches.
    std::future::pending().await
}

async fn wait_for_close(popup: &dyn PopupHandle) {
    let mut ticker = interval_at(Instant::now() + POPUP_POLL_INTERVAL, POPUP_POLL_INTERVAL);
    loop {
        ticker.tick().await;
        if popup.is_closed() {
            return;
        }
    }
}
