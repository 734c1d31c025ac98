use http::Method;

use crate::auth::BearerToken;
use crate::error::Result;
use crate::handler::{RawBody, ResponseHandler};
use crate::request::{parse_server_url, RequestSpec, AUTHORIZATION};
use crate::transport::Transport;

/// Fetches account data from a resource server with a bearer token.
///
/// The default handler passes the body through untouched; use
/// [`UserInfoHandler`](crate::UserInfoHandler) to decode a
/// [`UserInfo`](crate::UserInfo).
#[derive(Debug, Clone)]
pub struct UserInfoRequest<H = RawBody> {
    pub server_url: String,
    pub access_token: BearerToken,
    handler: H,
}

impl UserInfoRequest {
    pub fn new(server_url: impl Into<String>, access_token: impl Into<BearerToken>) -> Self {
        Self {
            server_url: server_url.into(),
            access_token: access_token.into(),
            handler: RawBody,
        }
    }
}

impl<H: ResponseHandler> UserInfoRequest<H> {
    pub fn with_response_handler<H2: ResponseHandler>(self, handler: H2) -> UserInfoRequest<H2> {
        UserInfoRequest {
            server_url: self.server_url,
            access_token: self.access_token,
            handler,
        }
    }

    pub fn prepare(&self) -> Result<RequestSpec> {
        let server_url = parse_server_url(&self.server_url)?;
        RequestSpec::new(Method::POST, server_url)
            .sensitive_header(AUTHORIZATION, &self.access_token.authorization())
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
