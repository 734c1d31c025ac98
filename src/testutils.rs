//! Test utilities for `oauth2_client`.
//!
//! Two ways to exercise the request builders without a real provider:
//!
//! * [`RecordingTransport`] never touches the network. It remembers every
//!   request it was asked to perform and answers with a canned response,
//!   which makes it easy to assert that invalid input caused zero calls.
//! * [`MockOAuthServer`] is a small `axum` server on an ephemeral loopback
//!   port that behaves like a cooperative authorization server. It checks
//!   the `Authorization` headers it receives and records each request.
//!
//! Both are public so downstream crates can reuse them in their own tests
//! via `use oauth2_client::testutils::*`.

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap as AxumHeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use url::Url;

use crate::auth::{basic_authorization, bearer_authorization};
use crate::error::{Error, Result};
use crate::transport::Transport;

pub const MOCK_CLIENT_ID: &str = "mock-client";
pub const MOCK_CLIENT_SECRET: &str = "mock-secret";
pub const MOCK_CODE: &str = "mock-code";
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
pub const MOCK_REFRESH_TOKEN: &str = "mock-refresh-token";

/// A request seen by [`RecordingTransport`] or [`MockOAuthServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

impl RecordedRequest {
    fn from_parts(
        method: Method,
        path: String,
        query: HashMap<String, String>,
        headers: &HeaderMap,
    ) -> Self {
        let header_text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            method,
            path,
            query,
            authorization: header_text(header::AUTHORIZATION),
            content_type: header_text(header::CONTENT_TYPE),
        }
    }
}

/// In-memory [`Transport`] answering every request with the same response.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    status: u16,
    content_type: String,
    body: Bytes,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingTransport {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies `200 OK` with a JSON body.
    pub fn json(body: serde_json::Value) -> Self {
        Self::new(200, "application/json", body.to_string())
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn perform(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        let query = url.query_pairs().into_owned().collect();
        let recorded = RecordedRequest::from_parts(method, url.path().to_string(), query, &headers);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(recorded);
        }

        let response = http::Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, self.content_type.as_str())
            .body(self.body.clone())
            .map_err(|e| Error::InvalidHeader(format!("Failed to build canned response: {e}")))?;
        Ok(reqwest::Response::from(response))
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    fn record(&self, path: &str, query: &HashMap<String, String>, headers: &AxumHeaderMap) {
        let recorded =
            RecordedRequest::from_parts(Method::POST, path.to_string(), query.clone(), headers);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(recorded);
        }
    }
}

/// A loopback authorization server for integration tests.
///
/// Routes (all `POST`):
///
/// * `/token`: expects the mock client's `Basic` credentials and
///   `code=mock-code`; answers with a JSON token.
/// * `/token/form`: same, answering form-encoded like GitHub does.
/// * `/refresh`: expects `refresh_token=mock-refresh-token`.
/// * `/revoke`: answers `200` with an empty body.
/// * `/userinfo`: expects `Bearer mock-access-token`.
///
/// Anything unexpected gets a `4xx` with an OAuth-style JSON error.
pub struct MockOAuthServer {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockOAuthServer {
    pub async fn start() -> Result<Self> {
        let state = MockState::default();
        let app = Router::new()
            .route("/token", post(token))
            .route("/token/form", post(token_form))
            .route("/refresh", post(refresh))
            .route("/revoke", post(revoke))
            .route("/userinfo", post(userinfo))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Drop for MockOAuthServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn oauth_error(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

fn has_client_credentials(headers: &AxumHeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(basic_authorization(MOCK_CLIENT_ID, MOCK_CLIENT_SECRET).as_str())
}

fn check_code(headers: &AxumHeaderMap, params: &HashMap<String, String>) -> Option<Response> {
    if !has_client_credentials(headers) {
        return Some(oauth_error(StatusCode::UNAUTHORIZED, "invalid_client"));
    }
    if params.get("grant_type").map(String::as_str) != Some("authorization_code") {
        return Some(oauth_error(StatusCode::BAD_REQUEST, "unsupported_grant_type"));
    }
    if params.get("code").map(String::as_str) != Some(MOCK_CODE) {
        return Some(oauth_error(StatusCode::BAD_REQUEST, "invalid_grant"));
    }
    None
}

async fn token(
    State(state): State<MockState>,
    headers: AxumHeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/token", &params, &headers);
    if let Some(rejection) = check_code(&headers, &params) {
        return rejection;
    }
    Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "token_type": "bearer",
        "refresh_token": MOCK_REFRESH_TOKEN,
        "expires_in": 3600,
        "scope": "get_user_info",
    }))
    .into_response()
}

async fn token_form(
    State(state): State<MockState>,
    headers: AxumHeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/token/form", &params, &headers);
    if let Some(rejection) = check_code(&headers, &params) {
        return rejection;
    }
    (
        [(header::CONTENT_TYPE, "application/x-www-form-urlencoded")],
        format!("access_token={MOCK_ACCESS_TOKEN}&scope=user&token_type=bearer"),
    )
        .into_response()
}

async fn refresh(
    State(state): State<MockState>,
    headers: AxumHeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/refresh", &params, &headers);
    if !has_client_credentials(&headers) {
        return oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");
    }
    if params.get("grant_type").map(String::as_str) != Some("refresh_token")
        || params.get("refresh_token").map(String::as_str) != Some(MOCK_REFRESH_TOKEN)
    {
        return oauth_error(StatusCode::BAD_REQUEST, "invalid_grant");
    }
    Json(json!({
        "access_token": "mock-access-token-2",
        "token_type": "bearer",
        "refresh_token": MOCK_REFRESH_TOKEN,
        "expires_in": 3600,
    }))
    .into_response()
}

async fn revoke(
    State(state): State<MockState>,
    headers: AxumHeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/revoke", &params, &headers);
    if !has_client_credentials(&headers) {
        return oauth_error(StatusCode::UNAUTHORIZED, "invalid_client");
    }
    StatusCode::OK.into_response()
}

async fn userinfo(
    State(state): State<MockState>,
    headers: AxumHeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record("/userinfo", &params, &headers);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(bearer_authorization(MOCK_ACCESS_TOKEN).as_str());
    if !authorized {
        return oauth_error(StatusCode::UNAUTHORIZED, "invalid_token");
    }
    Json(json!({
        "id": "42",
        "userName": "mock-user",
        "mobile": "555-0100",
        "email": "mock@example.com",
        "name": "Mock User",
    }))
    .into_response()
}

/// Initialize a tracing subscriber for tests.
/// It is safe to call this multiple times.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
