use http::Method;

use crate::auth::Credentials;
use crate::defaults;
use crate::error::{Error, Result};
use crate::handler::{RawBody, ResponseHandler};
use crate::request::{
    is_blank, or_default, parse_server_url, RequestSpec, AUTHORIZATION, CONTENT_TYPE,
};
use crate::transport::Transport;

/// Trades a refresh token for a new access token.
///
/// Sends `POST <server_url>?grant_type=refresh_token&refresh_token=..` with
/// the client's `Basic` authorization header. The default handler returns
/// the raw body; pass [`TokenResponseHandler`](crate::TokenResponseHandler)
/// to decode it.
#[derive(Debug, Clone)]
pub struct RefreshTokenRequest<H = RawBody> {
    pub server_url: String,
    pub credentials: Credentials,
    pub refresh_token: String,
    /// Defaults to `refresh_token`.
    pub grant_type: Option<String>,
    /// Sent as `Content-Type` when set; a blank value means `application/json`.
    pub content_type: Option<String>,
    handler: H,
}

impl RefreshTokenRequest {
    pub fn new(
        server_url: impl Into<String>,
        credentials: Credentials,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            credentials,
            refresh_token: refresh_token.into(),
            grant_type: None,
            content_type: None,
            handler: RawBody,
        }
    }
}

impl<H: ResponseHandler> RefreshTokenRequest<H> {
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_response_handler<H2: ResponseHandler>(
        self,
        handler: H2,
    ) -> RefreshTokenRequest<H2> {
        RefreshTokenRequest {
            server_url: self.server_url,
            credentials: self.credentials,
            refresh_token: self.refresh_token,
            grant_type: self.grant_type,
            content_type: self.content_type,
            handler,
        }
    }

    /// The refresh token is checked before the client credentials.
    pub fn prepare(&self) -> Result<RequestSpec> {
        let server_url = parse_server_url(&self.server_url)?;
        if is_blank(&self.refresh_token) {
            return Err(Error::RefreshTokenEmpty);
        }
        let authorization = self.credentials.authorization()?;
        let grant_type = or_default(
            self.grant_type.as_deref(),
            defaults::REFRESH_TOKEN_GRANT_TYPE,
        );

        let mut spec = RequestSpec::new(Method::POST, server_url)
            .require("refresh_token", self.refresh_token.as_str())
            .sensitive_header(AUTHORIZATION, &authorization)?
            .require("grant_type", grant_type);
        if let Some(content_type) = self.content_type.as_deref() {
            spec = spec.header(
                CONTENT_TYPE,
                or_default(Some(content_type), defaults::CONTENT_TYPE),
            )?;
        }
        Ok(spec)
    }

    pub async fn send<T>(self, transport: &T) -> Result<H::Output>
    where
        T: Transport + ?Sized,
    {
        let spec = self.prepare()?;
        let response = spec.send(transport).await?;
        self.handler.handle(response).await
    }
}
