//! API client for communicating with the FreelanceHub REST API.
//!
//! This module provides the `ApiClient` struct. A client value either carries
//! a bearer credential or it doesn't; the credential is attached to every
//! request that client sends. Nothing mutates shared default headers, so two
//! clients with different credentials can be used side by side.

use std::time::Duration;

use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::Credential;
use crate::models::{Project, PublicProfile, User};

use super::{ApiError, ApiResult};

// ============================================================================
// Constants
// ============================================================================

/// Default base URL of the backend API
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful response from `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_freelancer: bool,
}

#[derive(Debug, Serialize)]
struct ProfileUpdate<'a> {
    bio: &'a str,
    skills: &'a str,
}

#[derive(Debug, Serialize)]
struct BidRequest<'a> {
    amount: f64,
    proposal: &'a str,
}

#[derive(Debug, Serialize)]
struct AcceptBidRequest {
    bid_id: i64,
}

/// API client for the FreelanceHub backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Credential>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client without a credential
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given credential, sharing the connection pool.
    pub fn with_token(&self, token: Credential) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Same connection pool, no credential attached.
    pub fn anonymous(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    /// The credential this client attaches to its requests, if any
    pub fn credential(&self) -> Option<&Credential> {
        self.token.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> ApiResult<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token.expose()))
                .map_err(|_| {
                    ApiError::InvalidResponse("credential is not a valid header value".to_string())
                })?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> ApiResult<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request, retrying GETs with exponential backoff while rate limited.
    ///
    /// Mutations are not idempotent, so a 429 on one is returned at once.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Response> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            debug!(%method, url = %url, authenticated = self.token.is_some(), "Sending request");

            let mut request = self
                .client
                .request(method.clone(), &url)
                .headers(self.auth_headers()?);
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None if method != Method::GET => {
                    warn!(%method, url = %url, "Rate limited");
                    return Err(ApiError::RateLimited);
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.execute::<()>(Method::GET, path, None).await?;
        Self::parse(response, path).await
    }

    /// Send a mutation whose response body carries nothing we need
    async fn send_mutation<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        self.execute(method, path, Some(body)).await?;
        Ok(())
    }

    // ===== Authentication =====

    /// Exchange email and password for a credential and the user's identity
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest { email, password };
        let response = self.execute(Method::POST, "/auth/login", Some(&body)).await?;
        Self::parse(response, "/auth/login").await
    }

    /// Create a new account. No credential is issued.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.send_mutation(Method::POST, "/auth/register", request).await
    }

    // ===== Users =====

    /// Fetch the identity behind the attached credential
    pub async fn fetch_profile(&self) -> ApiResult<User> {
        self.get("/user/profile").await
    }

    /// Fetch a user's public profile with the reviews they received
    pub async fn fetch_user(&self, user_id: i64) -> ApiResult<PublicProfile> {
        self.get(&format!("/user/{}", user_id)).await
    }

    pub async fn update_profile(&self, bio: &str, skills: &str) -> ApiResult<()> {
        let body = ProfileUpdate { bio, skills };
        self.send_mutation(Method::PUT, "/user/profile", &body).await
    }

    // ===== Projects =====

    /// Fetch a project with its bids
    pub async fn fetch_project(&self, project_id: i64) -> ApiResult<Project> {
        self.get(&format!("/project/{}", project_id)).await
    }

    pub async fn place_bid(&self, project_id: i64, amount: f64, proposal: &str) -> ApiResult<()> {
        let body = BidRequest { amount, proposal };
        self.send_mutation(Method::POST, &format!("/project/{}/bid", project_id), &body)
            .await
    }

    pub async fn accept_bid(&self, project_id: i64, bid_id: i64) -> ApiResult<()> {
        let body = AcceptBidRequest { bid_id };
        self.send_mutation(
            Method::POST,
            &format!("/project/{}/accept_bid", project_id),
            &body,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("client builds")
    }

    fn user_json(id: i64) -> serde_json::Value {
        json!({"id": id, "username": "ada", "email": "a@b.com", "is_freelancer": true})
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            ApiClient::new("http://localhost:5000/api/", Duration::from_secs(1)).expect("builds");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/auth/login"), "http://localhost:5000/api/auth/login");
    }

    #[test]
    fn test_with_token_and_anonymous() {
        let client = ApiClient::new(DEFAULT_BASE_URL, Duration::from_secs(1)).expect("builds");
        assert!(client.credential().is_none());

        let authed = client.with_token(Credential::new("tok1"));
        assert_eq!(authed.credential().map(Credential::expose), Some("tok1"));
        assert!(client.credential().is_none());
        assert!(authed.anonymous().credential().is_none());
    }

    #[tokio::test]
    async fn test_login_sends_credentials_without_auth_header() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok1",
                "user": user_json(1),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).login("a@b.com", "pw").await.expect("login ok");
        assert_eq!(response.access_token, "tok1");
        assert_eq!(response.user.id, 1);

        let requests: Vec<Request> = server.received_requests().await.unwrap_or_default();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_fetch_profile_attaches_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/profile"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(5)))
            .mount(&server)
            .await;

        let client = client_for(&server).with_token(Credential::new("abc123"));
        let user = client.fetch_profile().await.expect("profile ok");
        assert_eq!(user.id, 5);
    }

    #[tokio::test]
    async fn test_fetch_profile_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/profile"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token has expired"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .with_token(Credential::new("old"))
            .fetch_profile()
            .await
            .expect_err("401 must fail");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_rate_limited_mutation_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/project/7/bid"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .with_token(Credential::new("tok"))
            .place_bid(7, 250.0, "Fast delivery")
            .await
            .expect_err("429 must fail");
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[tokio::test]
    async fn test_place_bid_rejected_carries_server_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/project/7/bid"))
            .and(body_json(json!({"amount": 250.0, "proposal": "Fast delivery"})))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"msg": "Project is not open"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .with_token(Credential::new("tok"))
            .place_bid(7, 250.0, "Fast delivery")
            .await
            .expect_err("400 must fail");
        assert_eq!(err.server_message(), Some("Project is not open"));
    }

    #[tokio::test]
    async fn test_mutations_hit_expected_paths() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/project/7/accept_bid"))
            .and(body_json(json!({"bid_id": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "Bid accepted"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/user/profile"))
            .and(body_json(json!({"bio": "Hi", "skills": "Rust,Go"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(json!({
                "username": "ada", "email": "a@b.com", "password": "pw", "is_freelancer": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"msg": "created"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_token(Credential::new("tok"));
        client.accept_bid(7, 3).await.expect("accept ok");
        client.update_profile("Hi", "Rust,Go").await.expect("update ok");
        client
            .anonymous()
            .register(&RegisterRequest {
                username: "ada".to_string(),
                email: "a@b.com".to_string(),
                password: "pw".to_string(),
                is_freelancer: true,
            })
            .await
            .expect("register ok");
    }

    #[tokio::test]
    async fn test_rate_limited_request_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/9"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9, "username": "zed", "reviews_received": []
            })))
            .mount(&server)
            .await;

        let profile = client_for(&server).fetch_user(9).await.expect("retry succeeds");
        assert_eq!(profile.user.username, "zed");
    }

    #[tokio::test]
    async fn test_invalid_json_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/project/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_project(1).await.expect_err("bad json");
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
