use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Performs the single network call behind each request.
///
/// Implementations must not retry; one call to `perform` is one request.
///
/// Transports that do not use `reqwest` for the network call can still
/// return a response by converting an `http::Response`:
///
/// ```
/// let response: reqwest::Response = http::Response::builder()
///     .status(200)
///     .body(r#"{"access_token":"at"}"#)
///     .unwrap()
///     .into();
/// assert_eq!(response.status(), 200);
/// ```
///
/// [`RecordingTransport`](crate::testutils::RecordingTransport) works this way.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
    ) -> Result<reqwest::Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        (**self).perform(method, url, headers).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn perform(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        (**self).perform(method, url, headers).await
    }
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransportConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl HttpTransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::InvalidConfiguration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http_client })
    }

    /// Wrap an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        info!(
            "Requesting {} {}{}",
            method,
            url.origin().ascii_serialization(),
            url.path()
        );

        let response = self
            .http_client
            .request(method, url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::RequestServerUrl(format!("Failed to send request: {e}")))?;

        debug!("HTTP response status: {}", response.status());
        Ok(response)
    }
}
