//! Page view-model flows: load, fire-and-refetch mutations, error messages

use std::time::Duration;

use freelancehub_core::auth::{MemoryTokenStore, SessionStore};
use freelancehub_core::pages::{LoginForm, PageView, ProfilePage, ProjectPage, RegisterForm};
use freelancehub_core::{ApiClient, Route};

use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn session_for(server: &MockServer, store: &MemoryTokenStore) -> SessionStore {
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("client builds");
    SessionStore::new(api, Box::new(store.clone()))
}

fn project_json(status: &str, bids: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 7,
        "title": "Landing page",
        "description": "Build a landing page",
        "budget": 1500.0,
        "status": status,
        "client": {"id": 1, "username": "carol", "is_freelancer": false},
        "freelancer": null,
        "bids": bids
    })
}

/// Log in as the given user through the mock backend
async fn logged_in(server: &MockServer, id: i64, is_freelancer: bool) -> SessionStore {
    let email = format!("user{}@b.com", id);
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": email, "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": format!("tok{}", id),
            "user": {"id": id, "username": "user", "is_freelancer": is_freelancer}
        })))
        .mount(server)
        .await;
    let mut session = session_for(server, &MemoryTokenStore::new());
    assert!(session.login(&email, "pw").await);
    session
}

#[tokio::test]
async fn test_project_page_load_and_permissions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(
            "open",
            json!([{"id": 3, "amount": 1200.0, "proposal": "Me!",
                    "freelancer": {"id": 2, "username": "fred", "is_freelancer": true}}]),
        )))
        .mount(&server)
        .await;

    let freelancer = logged_in(&server, 5, true).await;
    let mut page = ProjectPage::new(7);
    assert_eq!(page.view(), PageView::Loading);
    page.load(&freelancer).await;

    assert!(matches!(page.view(), PageView::Ready(p) if p.title == "Landing page"));
    let viewer = freelancer.identity();
    assert!(page.can_bid(viewer));
    assert!(!page.can_accept_bids(viewer));
    assert!(!page.shows_already_bid(viewer));

    let client_session = logged_in(&server, 1, false).await;
    let viewer = client_session.identity();
    assert!(page.is_client(viewer));
    assert!(page.can_accept_bids(viewer));
    assert!(!page.can_bid(viewer));
}

#[tokio::test]
async fn test_project_page_load_failure_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/project/7"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"msg": "db exploded"})))
        .mount(&server)
        .await;
    let session = session_for(&server, &MemoryTokenStore::new());

    let mut page = ProjectPage::new(7);
    page.load(&session).await;
    assert_eq!(page.view(), PageView::Failed("Failed to load project."));
}

#[tokio::test]
async fn test_submit_bid_refetches_and_clears_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/7/bid"))
        .and(body_json(json!({"amount": 900.0, "proposal": "Two weeks"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"msg": "Bid placed"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json(
            "open",
            json!([{"id": 4, "amount": 900.0, "proposal": "Two weeks",
                    "freelancer": {"id": 5, "username": "user", "is_freelancer": true}}]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let session = logged_in(&server, 5, true).await;
    let mut page = ProjectPage::new(7);
    page.bid_form.amount = "900".to_string();
    page.bid_form.proposal = "Two weeks".to_string();

    assert!(page.submit_bid(&session).await);
    assert!(page.bid_form.amount.is_empty());
    assert!(page.shows_already_bid(session.identity()));
    assert!(!page.can_bid(session.identity()));
}

#[tokio::test]
async fn test_submit_bid_invalid_input_sends_nothing() {
    let server = MockServer::start().await;
    let session = logged_in(&server, 5, true).await;
    let before = server.received_requests().await.unwrap_or_default().len();

    let mut page = ProjectPage::new(7);
    page.bid_form.amount = "0".to_string();
    page.bid_form.proposal = "cheap".to_string();

    assert!(!page.submit_bid(&session).await);
    assert!(page.bid_form.error.is_some());
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), before);
}

#[tokio::test]
async fn test_mutation_errors_prefer_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/7/bid"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"msg": "You already bid on this project"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/project/7/accept_bid"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let session = logged_in(&server, 5, true).await;

    let mut page = ProjectPage::new(7);
    page.bid_form.amount = "10".to_string();
    page.bid_form.proposal = "hello".to_string();
    assert!(!page.submit_bid(&session).await);
    assert_eq!(page.view(), PageView::Failed("You already bid on this project"));

    let mut page = ProjectPage::new(7);
    assert!(!page.accept_bid(&session, 3).await);
    assert_eq!(page.view(), PageView::Failed("Failed to accept bid."));
}

#[tokio::test]
async fn test_accept_bid_refetches_project() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project/7/accept_bid"))
        .and(body_json(json!({"bid_id": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/project/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_json("in_progress", json!([]))))
        .expect(1)
        .mount(&server)
        .await;
    let session = logged_in(&server, 1, false).await;

    let mut page = ProjectPage::new(7);
    assert!(page.accept_bid(&session, 3).await);
    // No longer open, so no more accepting
    assert!(!page.can_accept_bids(session.identity()));
}

#[tokio::test]
async fn test_profile_edit_refetches_page_and_identity() {
    let server = MockServer::start().await;
    let session_owner = {
        let mut session = logged_in(&server, 5, true).await;
        Mock::given(method("GET"))
            .and(path("/user/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "username": "user", "is_freelancer": true,
                "bio": "Updated bio", "skills": "Rust",
                "reviews_received": [{"id": 1, "rating": 4, "comment": "Solid",
                                      "reviewer": {"id": 1, "username": "carol"}}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/user/profile"))
            .and(body_json(json!({"bio": "Updated bio", "skills": "Rust"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "username": "user", "is_freelancer": true, "bio": "Updated bio"
            })))
            .mount(&server)
            .await;

        let mut page = ProfilePage::new(5);
        page.load(&session).await;
        assert!(page.is_current_user(session.identity()));
        page.start_editing();
        page.edit_bio = "Updated bio".to_string();
        page.edit_skills = "Rust".to_string();

        assert!(page.save_edits(&mut session).await);
        assert!(!page.is_editing());
        let profile = page.profile().expect("profile loaded");
        assert_eq!(profile.reviews_received.len(), 1);
        session
    };

    assert_eq!(
        session_owner.identity().and_then(|u| u.bio.as_deref()),
        Some("Updated bio")
    );
}

#[tokio::test]
async fn test_profile_load_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let session = session_for(&server, &MemoryTokenStore::new());

    let mut page = ProfilePage::new(99);
    page.load(&session).await;
    assert_eq!(page.view(), PageView::Failed("Failed to load profile."));
    assert!(!page.is_current_user(session.identity()));
}

#[tokio::test]
async fn test_login_form_messages_and_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok1",
            "user": {"id": 1, "username": "ada"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let mut session = session_for(&server, &MemoryTokenStore::new());

    let mut form = LoginForm::with_email("a@b.com");
    form.password = "nope".to_string();
    assert_eq!(form.submit(&mut session).await, None);
    assert_eq!(
        form.error.as_deref(),
        Some("Invalid email or password. Please try again.")
    );

    form.password = "pw".to_string();
    assert_eq!(form.submit(&mut session).await, Some(Route::Projects));
    assert!(form.error.is_none());
    assert!(form.password.is_empty());
}

#[tokio::test]
async fn test_register_form_redirects_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    let session = session_for(&server, &MemoryTokenStore::new());

    let mut form = RegisterForm {
        username: "new".to_string(),
        email: "n@b.com".to_string(),
        password: "pw".to_string(),
        is_freelancer: true,
        ..RegisterForm::default()
    };
    assert_eq!(form.submit(&session).await, Some(Route::Login));
    assert!(form.success.is_some());

    let mut empty = RegisterForm::default();
    assert_eq!(empty.submit(&session).await, None);
    assert!(empty.error.is_some());
}
