use http::Method;

use crate::auth::Credentials;
use crate::defaults;
use crate::error::Result;
use crate::handler::{RawBody, ResponseHandler};
use crate::request::{or_default, parse_server_url, RequestSpec, AUTHORIZATION, CONTENT_TYPE};
use crate::transport::Transport;

/// Asks the authorization server to invalidate a token.
///
/// Sends `POST <server_url>?token=..&token_type_hint=..` with the client's
/// `Basic` authorization header and `Content-Type: application/json` unless
/// another content type is configured.
#[derive(Debug, Clone)]
pub struct RevokeTokenRequest<H = RawBody> {
    pub server_url: String,
    pub credentials: Credentials,
    pub token: String,
    /// Defaults to `access_token`.
    pub token_type_hint: Option<String>,
    /// A blank value means `application/json`.
    pub content_type: String,
    handler: H,
}

impl RevokeTokenRequest {
    pub fn new(
        server_url: impl Into<String>,
        credentials: Credentials,
        token: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            credentials,
            token: token.into(),
            token_type_hint: None,
            content_type: defaults::CONTENT_TYPE.to_string(),
            handler: RawBody,
        }
    }
}

impl<H: ResponseHandler> RevokeTokenRequest<H> {
    /// `access_token` or `refresh_token`, per RFC 7009.
    pub fn with_token_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.token_type_hint = Some(hint.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_response_handler<H2: ResponseHandler>(self, handler: H2) -> RevokeTokenRequest<H2> {
        RevokeTokenRequest {
            server_url: self.server_url,
            credentials: self.credentials,
            token: self.token,
            token_type_hint: self.token_type_hint,
            content_type: self.content_type,
            handler,
        }
    }

    pub fn prepare(&self) -> Result<RequestSpec> {
        let server_url = parse_server_url(&self.server_url)?;
        let authorization = self.credentials.authorization()?;
        let hint = or_default(
            self.token_type_hint.as_deref(),
            defaults::REVOKE_TOKEN_TYPE_HINT,
        );

        RequestSpec::new(Method::POST, server_url)
            .sensitive_header(AUTHORIZATION, &authorization)?
            .header(
                CONTENT_TYPE,
                or_default(Some(self.content_type.as_str()), defaults::CONTENT_TYPE),
            )
            .map(|spec| {
                spec.require("token", self.token.as_str())
                    .require("token_type_hint", hint)
            })
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
