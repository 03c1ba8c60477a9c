use echomind_core::connectors::ConnectorType;
use echomind_core::google::{GoogleService, PopupFeatures, PopupHandle, PopupLauncher};
use echomind_core::{
    ApiClient, ConnectorDraft, ConnectorSetup, GoogleReadiness, LinkError, MessageBus,
    OAuthCoordinator, SetupError,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;

struct BlockedLauncher;

impl PopupLauncher for BlockedLauncher {
    fn open(&self, _: &str, _: &str, _: &PopupFeatures) -> Option<Arc<dyn PopupHandle>> {
        None
    }
}

fn setup(server: &ServerGuard) -> ConnectorSetup {
    let client = ApiClient::new(server.url(), Some("tok".into())).expect("client");
    let oauth = OAuthCoordinator::new(client.clone(), Arc::new(BlockedLauncher), MessageBus::new());
    ConnectorSetup::new(client, oauth)
}

async fn mock_configured(server: &mut ServerGuard, body: Value) -> mockito::Mock {
    server
        .mock("GET", "/google/auth/configured")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

async fn mock_grants(server: &mut ServerGuard, drive: bool, gmail: bool) -> mockito::Mock {
    server
        .mock("GET", "/google/auth/status")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "connected": drive || gmail,
                "granted_scopes": [],
                "email": "test@example.com",
                "services": {"drive": drive, "gmail": gmail, "calendar": false, "contacts": false}
            })
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_create(server: &mut ServerGuard, body: Value, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/connectors")
        .match_body(Matcher::Json(body))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":2,"name":"created"}"#)
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn authorized_google_connector_is_created_with_defaults() {
    let mut server = Server::new_async().await;
    let _configured = mock_configured(&mut server, json!({"configured": true})).await;
    let _grants = mock_grants(&mut server, false, true).await;
    let create = mock_create(
        &mut server,
        json!({
            "name": "Gmail Connector",
            "type": "CONNECTOR_TYPE_GMAIL",
            "scope": "CONNECTOR_SCOPE_USER",
            "config": {},
            "refresh_freq_minutes": 60
        }),
        1,
    )
    .await;

    let setup = setup(&server);
    let draft = ConnectorDraft::new("  Gmail Connector ", ConnectorType::Gmail);
    assert_eq!(
        setup.readiness(&draft).await.expect("readiness"),
        GoogleReadiness::Authorized {
            email: Some("test@example.com".into())
        }
    );

    let connector = setup.submit(&draft).await.expect("created");
    assert_eq!(connector.id, 2);
    create.assert_async().await;
}

#[tokio::test]
async fn missing_grant_blocks_submission() {
    let mut server = Server::new_async().await;
    let _configured = mock_configured(&mut server, json!({"configured": true})).await;
    let _grants = mock_grants(&mut server, false, true).await;
    let create = server
        .mock("POST", "/connectors")
        .expect(0)
        .create_async()
        .await;

    let setup = setup(&server);
    let draft = ConnectorDraft::new("My Drive Connector", ConnectorType::GoogleDrive);
    assert_eq!(
        setup.readiness(&draft).await.expect("readiness"),
        GoogleReadiness::NeedsAuthorization(GoogleService::Drive)
    );

    let err = setup.submit(&draft).await.unwrap_err();
    assert!(matches!(err, SetupError::GoogleNotAuthorized(GoogleService::Drive)));
    create.assert_async().await;
}

#[tokio::test]
async fn unconfigured_server_reports_admin_message() {
    let mut server = Server::new_async().await;
    let _configured = mock_configured(
        &mut server,
        json!({"configured": false, "message": "Google OAuth credentials not set"}),
    )
    .await;
    let status = server
        .mock("GET", "/google/auth/status")
        .expect(0)
        .create_async()
        .await;

    let setup = setup(&server);
    let draft = ConnectorDraft::new("Calendar", ConnectorType::GoogleCalendar);
    assert_eq!(
        setup.readiness(&draft).await.expect("readiness"),
        GoogleReadiness::Unavailable("Google OAuth credentials not set".into())
    );

    let err = setup.submit(&draft).await.unwrap_err();
    assert_eq!(err.to_string(), "Google OAuth credentials not set");
    status.assert_async().await;
}

#[tokio::test]
async fn non_google_types_skip_the_google_checks() {
    let mut server = Server::new_async().await;
    let configured = server
        .mock("GET", "/google/auth/configured")
        .expect(0)
        .create_async()
        .await;
    let create = mock_create(
        &mut server,
        json!({
            "name": "Wiki",
            "type": "CONNECTOR_TYPE_WEB",
            "scope": "CONNECTOR_SCOPE_USER",
            "config": {},
            "refresh_freq_minutes": 60
        }),
        1,
    )
    .await;

    let setup = setup(&server);
    let draft = ConnectorDraft::new("Wiki", ConnectorType::Web);
    assert_eq!(
        setup.readiness(&draft).await.expect("readiness"),
        GoogleReadiness::NotRequired
    );
    setup.submit(&draft).await.expect("created");

    configured.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn shared_drive_id_lands_in_config() {
    let mut server = Server::new_async().await;
    let _configured = mock_configured(&mut server, json!({"configured": true})).await;
    let _grants = mock_grants(&mut server, true, false).await;
    let create = mock_create(
        &mut server,
        json!({
            "name": "Team Drive",
            "type": "CONNECTOR_TYPE_GOOGLE_DRIVE",
            "scope": "CONNECTOR_SCOPE_USER",
            "config": {"drive_id": "0AbCdEf"},
            "refresh_freq_minutes": 60
        }),
        1,
    )
    .await;

    let draft = ConnectorDraft::new("Team Drive", ConnectorType::GoogleDrive).drive_id("0AbCdEf");
    setup(&server).submit(&draft).await.expect("created");
    create.assert_async().await;
}

#[tokio::test]
async fn blank_name_is_rejected_before_any_request() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/connectors")
        .expect(0)
        .create_async()
        .await;

    let err = setup(&server)
        .submit(&ConnectorDraft::new("   ", ConnectorType::Gmail))
        .await
        .unwrap_err();

    assert!(matches!(err, SetupError::MissingName));
    any.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn blocked_popup_surfaces_from_authorize() {
    let mut server = Server::new_async().await;
    let _url = server
        .mock("GET", "/google/auth/url")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"url":"https://consent"}"#)
        .create_async()
        .await;

    let err = setup(&server)
        .authorize(GoogleService::Drive)
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::PopupBlocked));
    assert_eq!(
        err.to_string(),
        "Popup was blocked by the browser. Please allow popups for this site."
    );
}
