//! Turning a raw HTTP response into something useful.
//!
//! Every request builder takes exactly one [`ResponseHandler`]. The defaults
//! are [`RawBody`] (refresh, revoke, user info) and [`TokenResponseHandler`]
//! (code exchange). Callers can supply their own implementation or wrap an
//! async closure with [`handler_fn`].

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::future::Future;
use tracing::warn;

use crate::error::{Error, Result};

#[async_trait]
pub trait ResponseHandler: Send + Sync {
    type Output: Send;

    /// Consume the response. The body is released when `response` is dropped,
    /// whichever way this returns.
    async fn handle(&self, response: reqwest::Response) -> Result<Self::Output>;
}

/// Reads the whole body, regardless of status.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBody;

#[async_trait]
impl ResponseHandler for RawBody {
    type Output = Bytes;

    async fn handle(&self, response: reqwest::Response) -> Result<Bytes> {
        read_body(response).await
    }
}

/// Rejects non-2xx responses and decodes an [`AccessTokenResponse`].
///
/// JSON is expected; a form-encoded body is accepted when the server says so
/// in its `Content-Type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenResponseHandler;

#[async_trait]
impl ResponseHandler for TokenResponseHandler {
    type Output = AccessTokenResponse;

    async fn handle(&self, response: reqwest::Response) -> Result<AccessTokenResponse> {
        let is_form = content_type(&response)
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        let body = successful_body(response).await?;

        if is_form {
            AccessTokenResponse::from_form(&body)
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| Error::Decode(format!("Invalid token response: {e}")))
        }
    }
}

/// Rejects non-2xx responses and decodes a [`UserInfo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserInfoHandler;

#[async_trait]
impl ResponseHandler for UserInfoHandler {
    type Output = UserInfo;

    async fn handle(&self, response: reqwest::Response) -> Result<UserInfo> {
        let body = successful_body(response).await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::Decode(format!("Invalid user info response: {e}")))
    }
}

/// Adapter returned by [`handler_fn`].
pub struct HandlerFn<F> {
    f: F,
}

/// Use an async closure as a [`ResponseHandler`].
///
/// ```no_run
/// use oauth2_client::{handler_fn, Error};
///
/// let status_only = handler_fn(|response: reqwest::Response| async move {
///     Ok::<_, Error>(response.status().as_u16())
/// });
/// ```
pub fn handler_fn<F, Fut, T>(f: F) -> HandlerFn<F>
where
    F: Fn(reqwest::Response) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    HandlerFn { f }
}

#[async_trait]
impl<F, Fut, T> ResponseHandler for HandlerFn<F>
where
    F: Fn(reqwest::Response) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    type Output = T;

    async fn handle(&self, response: reqwest::Response) -> Result<T> {
        (self.f)(response).await
    }
}

/// Successful reply from a token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Lifetime of the access token in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl AccessTokenResponse {
    /// Decode `access_token=...&token_type=bearer&scope=...`.
    pub fn from_form(body: &[u8]) -> Result<Self> {
        let mut fields: HashMap<String, String> = url::form_urlencoded::parse(body)
            .into_owned()
            .collect();

        let access_token = fields
            .remove("access_token")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Decode("Token response has no access_token".to_string()))?;
        let expires_in = match fields.remove("expires_in") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                Error::Decode(format!("Invalid expires_in value {raw:?}: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            access_token,
            token_type: fields.remove("token_type").unwrap_or_default(),
            refresh_token: fields.remove("refresh_token"),
            expires_in,
            scope: fields.remove("scope"),
        })
    }
}

/// Account data returned by a user-info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Accepts either a JSON string or number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,

    #[serde(default)]
    pub mobile: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Provider-specific fields
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
}

async fn read_body(response: reqwest::Response) -> Result<Bytes> {
    response
        .bytes()
        .await
        .map_err(|e| Error::Decode(format!("Failed to read response body: {e}")))
}

/// The body of a 2xx response, or [`Error::Status`] with the body text.
pub(crate) async fn successful_body(response: reqwest::Response) -> Result<Bytes> {
    let status = response.status();
    let body = read_body(response).await?;
    if !status.is_success() {
        warn!("Server responded with status {}", status);
        return Err(Error::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: &str, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, content_type)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_raw_body_ignores_status() {
        let body = RawBody
            .handle(response(500, "text/plain", "boom"))
            .await
            .unwrap();
        assert_eq!(&body[..], b"boom");
    }

    #[tokio::test]
    async fn test_token_handler_decodes_json() {
        let token = TokenResponseHandler
            .handle(response(
                200,
                "application/json",
                r#"{"access_token":"at","token_type":"bearer","refresh_token":"rt","expires_in":3600,"scope":"read"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(token.access_token, "at");
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.refresh_token.as_deref(), Some("rt"));
        assert_eq!(token.expires_in, Some(3600));
        assert_eq!(token.scope.as_deref(), Some("read"));
    }

    #[tokio::test]
    async fn test_token_handler_decodes_form() {
        let token = TokenResponseHandler
            .handle(response(
                200,
                "application/x-www-form-urlencoded; charset=utf-8",
                "access_token=gho_abc&scope=user&token_type=bearer",
            ))
            .await
            .unwrap();
        assert_eq!(token.access_token, "gho_abc");
        assert_eq!(token.scope.as_deref(), Some("user"));
        assert_eq!(token.refresh_token, None);
    }

    #[tokio::test]
    async fn test_token_handler_rejects_non_success() {
        let err = TokenResponseHandler
            .handle(response(401, "application/json", r#"{"error":"invalid_client"}"#))
            .await
            .unwrap_err();
        match err {
            Error::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid_client"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_token_handler_rejects_malformed_json() {
        let err = TokenResponseHandler
            .handle(response(200, "application/json", "not json"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_handler_fn() {
        let handler = handler_fn(|response: reqwest::Response| async move {
            Ok::<_, Error>(response.status().as_u16())
        });
        assert_eq!(handler.handle(response(204, "text/plain", "")).await.unwrap(), 204);
    }

    #[test]
    fn test_from_form_requires_access_token() {
        assert!(matches!(
            AccessTokenResponse::from_form(b"error=bad_verification_code"),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            AccessTokenResponse::from_form(b"access_token=a&expires_in=soon"),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_user_info_accepts_numeric_id() {
        let info: UserInfo = serde_json::from_str(
            r#"{"id":583231,"userName":"octocat","email":"octo@example.com","login":"octocat"}"#,
        )
        .unwrap();
        assert_eq!(info.id, "583231");
        assert_eq!(info.user_name.as_deref(), Some("octocat"));
        assert_eq!(info.mobile, None);
        assert_eq!(
            info.additional.get("login"),
            Some(&serde_json::Value::String("octocat".into()))
        );
    }
}
