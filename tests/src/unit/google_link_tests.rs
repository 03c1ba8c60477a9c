use echomind_core::google::{
    GoogleService, LinkError, LinkOutcome, MessageBus, OAuthCoordinator, PopupFeatures,
    PopupHandle, PopupLauncher,
};
use echomind_core::ApiClient;
use mockito::{Matcher, Server, ServerGuard};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

struct OpenPopup;

impl PopupHandle for OpenPopup {
    fn is_closed(&self) -> bool {
        false
    }
}

/// Opens a never-closing popup and, once the coordinator is listening,
/// plays back `replies` onto the bus the way the callback page would.
struct ScriptedLauncher {
    bus: MessageBus,
    replies: Vec<Value>,
    opened: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedLauncher {
    fn new(bus: &MessageBus, replies: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            bus: bus.clone(),
            replies,
            opened: Mutex::new(Vec::new()),
        })
    }

    fn opened(&self) -> Vec<(String, String, String)> {
        self.opened.lock().clone()
    }
}

impl PopupLauncher for ScriptedLauncher {
    fn open(
        &self,
        url: &str,
        target: &str,
        features: &PopupFeatures,
    ) -> Option<Arc<dyn PopupHandle>> {
        self.opened.lock().push((
            url.to_string(),
            target.to_string(),
            features.to_feature_string(),
        ));
        let bus = self.bus.clone();
        let replies = self.replies.clone();
        tokio::spawn(async move {
            while bus.listener_count() == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            for reply in replies {
                bus.post(reply);
            }
        });
        Some(Arc::new(OpenPopup))
    }
}

fn client(server: &ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), Some("tok".into())).expect("client")
}

async fn mock_auth_url(server: &mut ServerGuard, service: &str, body: Value) -> mockito::Mock {
    server
        .mock("GET", "/google/auth/url")
        .match_header("authorization", "Bearer tok")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("service".into(), service.into()),
            Matcher::UrlEncoded("mode".into(), "popup".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn link_opens_consent_popup_and_settles_on_matching_success() {
    let mut server = Server::new_async().await;
    let auth_url = mock_auth_url(
        &mut server,
        "drive",
        json!({"url": "https://accounts.google.com/o/oauth2/auth?state=s1"}),
    )
    .await;

    let bus = MessageBus::new();
    let launcher = ScriptedLauncher::new(
        &bus,
        vec![
            json!({"type": "google-oauth-success", "service": "gmail"}),
            json!({"type": "something-else"}),
            json!({"type": "google-oauth-success", "service": "drive"}),
        ],
    );
    let coordinator = OAuthCoordinator::new(client(&server), launcher.clone(), bus.clone());

    let outcome = coordinator
        .link_service(GoogleService::Drive)
        .await
        .expect("linked");

    assert_eq!(outcome, LinkOutcome::linked(GoogleService::Drive));
    assert_eq!(
        launcher.opened(),
        vec![(
            "https://accounts.google.com/o/oauth2/auth?state=s1".to_string(),
            "google-oauth".to_string(),
            "width=500,height=600,popup=yes,scrollbars=yes".to_string(),
        )]
    );
    assert_eq!(bus.listener_count(), 0);
    auth_url.assert_async().await;
}

#[tokio::test]
async fn consent_error_resolves_negative_outcome() {
    let mut server = Server::new_async().await;
    let _auth_url = mock_auth_url(&mut server, "contacts", json!({"url": "https://consent"})).await;

    let bus = MessageBus::new();
    let launcher = ScriptedLauncher::new(
        &bus,
        vec![json!({"type": "google-oauth-error", "error": "access_denied"})],
    );
    let coordinator = OAuthCoordinator::new(client(&server), launcher, bus.clone());

    let outcome = coordinator
        .link_service(GoogleService::Contacts)
        .await
        .expect("declined is not an error");

    assert!(!outcome.success);
    assert_eq!(outcome.service, GoogleService::Contacts);
    assert_eq!(bus.listener_count(), 0);
}

#[tokio::test]
async fn backend_refusal_is_propagated_without_opening_popup() {
    let mut server = Server::new_async().await;
    let _auth_url = server
        .mock("GET", "/google/auth/url")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail":"Google OAuth is not configured"}"#)
        .create_async()
        .await;

    let bus = MessageBus::new();
    let launcher = ScriptedLauncher::new(&bus, Vec::new());
    let coordinator = OAuthCoordinator::new(client(&server), launcher.clone(), bus.clone());

    let err = coordinator
        .link_service(GoogleService::Calendar)
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::AuthUrl(_)));
    assert_eq!(err.to_string(), "Google OAuth is not configured");
    assert!(launcher.opened().is_empty());
    assert_eq!(bus.listener_count(), 0);
}

#[tokio::test]
async fn empty_authorization_url_declines_without_popup() {
    let mut server = Server::new_async().await;
    let _auth_url = mock_auth_url(&mut server, "gmail", json!({"url": ""})).await;

    let bus = MessageBus::new();
    let launcher = ScriptedLauncher::new(&bus, Vec::new());
    let coordinator = OAuthCoordinator::new(client(&server), launcher.clone(), bus);

    let outcome = coordinator
        .link_service(GoogleService::Gmail)
        .await
        .expect("outcome");

    assert_eq!(outcome, LinkOutcome::declined(GoogleService::Gmail));
    assert!(launcher.opened().is_empty());
}

#[tokio::test]
async fn concurrent_links_for_different_services_settle_independently() {
    let mut server = Server::new_async().await;
    let _drive = mock_auth_url(&mut server, "drive", json!({"url": "https://consent/drive"})).await;
    let _gmail = mock_auth_url(&mut server, "gmail", json!({"url": "https://consent/gmail"})).await;

    // Each launcher replays nothing; the test posts both successes once
    // both coordinators are listening.
    let bus = MessageBus::new();
    let launcher = ScriptedLauncher::new(&bus, Vec::new());
    let coordinator = OAuthCoordinator::new(client(&server), launcher, bus.clone());

    let poster = async {
        while bus.listener_count() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        bus.post(json!({"type": "google-oauth-success", "service": "gmail"}));
        bus.post(json!({"type": "google-oauth-success", "service": "drive"}));
    };
    let (drive, gmail, ()) = tokio::join!(
        coordinator.link_service(GoogleService::Drive),
        coordinator.link_service(GoogleService::Gmail),
        poster
    );

    assert_eq!(drive.expect("drive"), LinkOutcome::linked(GoogleService::Drive));
    assert_eq!(gmail.expect("gmail"), LinkOutcome::linked(GoogleService::Gmail));
    assert_eq!(bus.listener_count(), 0);
}

#[tokio::test]
async fn every_service_ignores_successes_for_the_others() {
    let mut server = Server::new_async().await;
    for service in GoogleService::ALL {
        let _auth_url = mock_auth_url(
            &mut server,
            service.as_str(),
            json!({"url": format!("https://consent/{service}")}),
        )
        .await;

        let mut replies: Vec<Value> = GoogleService::ALL
            .into_iter()
            .filter(|other| *other != service)
            .map(|other| json!({"type": "google-oauth-success", "service": other}))
            .collect();
        replies.push(json!({"type": "google-oauth-success", "service": service}));

        let bus = MessageBus::new();
        let launcher = ScriptedLauncher::new(&bus, replies);
        let coordinator = OAuthCoordinator::new(client(&server), launcher, bus.clone());

        let outcome = coordinator.link_service(service).await.expect("linked");

        assert_eq!(outcome, LinkOutcome::linked(service));
        assert_eq!(bus.listener_count(), 0);
    }
}
