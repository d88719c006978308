//! Session lifecycle scenarios against a wiremock backend

use std::time::Duration;

use freelancehub_core::auth::{AuthState, MemoryTokenStore, SessionStore};
use freelancehub_core::{ApiClient, Navigator, Route};

use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

fn session_for(server: &MockServer, store: &MemoryTokenStore) -> SessionStore {
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("client builds");
    SessionStore::new(api, Box::new(store.clone()))
}

fn user_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "username": "ada",
        "email": "a@b.com",
        "is_freelancer": true,
        "bio": "Rustacean",
        "skills": "Rust,SQL",
        "avg_rating": 4.5
    })
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok1",
            "user": user_json(1),
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_populates_session_and_storage() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    let store = MemoryTokenStore::new();
    let mut session = session_for(&server, &store);

    assert!(session.login("a@b.com", "pw").await);

    assert!(session.is_authenticated());
    assert_eq!(session.credential().map(|c| c.expose()), Some("tok1"));
    assert_eq!(session.identity().map(|u| u.id), Some(1));
    assert_eq!(store.stored().as_deref(), Some("tok1"));
    assert_eq!(
        session.client().credential().map(|c| c.expose()),
        Some("tok1")
    );
}

#[tokio::test]
async fn test_failed_login_changes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Bad credentials"})))
        .mount(&server)
        .await;
    let store = MemoryTokenStore::new();
    let mut session = session_for(&server, &store);
    let generation = session.generation();

    assert!(!session.login("a@b.com", "wrong").await);

    assert!(!session.is_authenticated());
    assert!(session.credential().is_none());
    assert!(store.stored().is_none());
    assert_eq!(session.generation(), generation);
}

#[tokio::test]
async fn test_login_server_error_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let store = MemoryTokenStore::new();
    let mut session = session_for(&server, &store);

    assert!(!session.login("a@b.com", "pw").await);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_everything_and_detaches_header() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/project/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let store = MemoryTokenStore::new();
    let mut session = session_for(&server, &store);
    assert!(session.login("a@b.com", "pw").await);

    session.logout();

    assert!(!session.is_authenticated());
    assert!(session.credential().is_none());
    assert!(store.stored().is_none());
    assert!(session.client().credential().is_none());

    // A request sent after logout carries no Authorization header
    let _ = session.client().fetch_project(7).await;
    let requests: Vec<Request> = server.received_requests().await.unwrap_or_default();
    let last = requests.last().expect("request recorded");
    assert_eq!(last.url.path(), "/project/7");
    assert!(last.headers.get("authorization").is_none());

    // Idempotent
    session.logout();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_bootstrap_with_rejected_credential_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let store = MemoryTokenStore::with_token("abc123");
    let mut session = session_for(&server, &store);
    assert!(session.is_loading());

    session.bootstrap().await;

    assert!(session.credential().is_none());
    assert!(session.identity().is_none());
    assert!(!session.is_loading());
    assert!(!session.is_authenticated());
    assert!(store.stored().is_none());
    assert!(session.client().credential().is_none());
}

#[tokio::test]
async fn test_bootstrap_with_accepted_credential_hydrates_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(42)))
        .expect(1)
        .mount(&server)
        .await;
    let store = MemoryTokenStore::with_token("abc123");
    let mut session = session_for(&server, &store);

    session.bootstrap().await;
    // Second call is a no-op for the same credential
    session.bootstrap().await;

    assert!(session.is_authenticated());
    let identity = session.identity().expect("identity");
    assert_eq!(identity.id, 42);
    assert_eq!(identity.skill_list(), vec!["Rust", "SQL"]);
    assert_eq!(store.stored().as_deref(), Some("abc123"));
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_bootstrap_network_failure_treated_as_invalid() {
    // Nothing listens here, so the request fails at the transport level
    let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).expect("client builds");
    let store = MemoryTokenStore::with_token("abc123");
    let mut session = SessionStore::new(api, Box::new(store.clone()));

    session.bootstrap().await;

    assert!(session.credential().is_none());
    assert!(store.stored().is_none());
}

#[tokio::test]
async fn test_bootstrap_without_credential_sends_nothing() {
    let server = MockServer::start().await;
    let store = MemoryTokenStore::new();
    let mut session = session_for(&server, &store);

    assert!(!session.is_loading());
    session.bootstrap().await;

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_register_never_mutates_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "new", "email": "n@b.com", "password": "pw", "is_freelancer": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"msg": "User created"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"msg": "Email taken"})))
        .mount(&server)
        .await;
    let store = MemoryTokenStore::new();
    let session = session_for(&server, &store);
    let generation = session.generation();

    assert!(session.register("new", "n@b.com", "pw", false).await);
    assert!(!session.register("dup", "n@b.com", "pw", true).await);

    assert!(!session.is_authenticated());
    assert!(session.credential().is_none());
    assert!(store.stored().is_none());
    assert_eq!(session.generation(), generation);
}

#[tokio::test]
async fn test_login_then_logout_before_validation_lands() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/user/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1)))
        .mount(&server)
        .await;
    let store = MemoryTokenStore::new();
    let mut session = session_for(&server, &store);
    assert!(session.login("a@b.com", "pw").await);

    // Validation for the freshly issued credential starts, then the user logs out
    let validation = session.begin_validation().expect("new credential needs validation");
    session.logout();
    let outcome = validation.run().await;

    assert!(!session.apply_validation(outcome));
    assert!(session.identity().is_none());
    assert!(store.stored().is_none());

    let mut nav = Navigator::new(Route::MyProfile);
    assert_eq!(nav.enforce(&session), Route::Login);
}
