use http::Method;

use crate::auth::Credentials;
use crate::defaults;
use crate::error::{Error, Result};
use crate::handler::{ResponseHandler, TokenResponseHandler};
use crate::request::{
    is_blank, or_default, parse_server_url, RequestSpec, AUTHORIZATION, CONTENT_TYPE,
};
use crate::transport::Transport;

/// Exchanges an authorization code for an access token.
///
/// Sends `POST <server_url>?code=..&grant_type=..[&redirect_url=..]` with a
/// `Basic` authorization header built from the client credentials.
#[derive(Debug, Clone)]
pub struct AccessTokenRequest<H = TokenResponseHandler> {
    pub server_url: String,
    pub credentials: Credentials,
    pub code: String,
    /// Defaults to `authorization_code`.
    pub grant_type: Option<String>,
    pub redirect_uri: Option<String>,
    /// Sent as `Content-Type` when set; a blank value means `application/json`.
    pub content_type: Option<String>,
    handler: H,
}

impl AccessTokenRequest {
    pub fn new(
        server_url: impl Into<String>,
        credentials: Credentials,
        code: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            credentials,
            code: code.into(),
            grant_type: None,
            redirect_uri: None,
            content_type: None,
            handler: TokenResponseHandler,
        }
    }
}

impl<H: ResponseHandler> AccessTokenRequest<H> {
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Replace the default handler, which decodes an
    /// [`AccessTokenResponse`](crate::AccessTokenResponse) and rejects non-2xx
    /// statuses.
    pub fn with_response_handler<H2: ResponseHandler>(
        self,
        handler: H2,
    ) -> AccessTokenRequest<H2> {
        AccessTokenRequest {
            server_url: self.server_url,
            credentials: self.credentials,
            code: self.code,
            grant_type: self.grant_type,
            redirect_uri: self.redirect_uri,
            content_type: self.content_type,
            handler,
        }
    }

    pub fn prepare(&self) -> Result<RequestSpec> {
        let server_url = parse_server_url(&self.server_url)?;
        let authorization = self.credentials.authorization()?;
        let grant_type = or_default(
            self.grant_type.as_deref(),
            defaults::ACCESS_TOKEN_GRANT_TYPE,
        );
        if is_blank(&self.code) {
            return Err(Error::CodeEmpty);
        }

        let mut spec = RequestSpec::new(Method::POST, server_url)
            .sensitive_header(AUTHORIZATION, &authorization)?
            .require("grant_type", grant_type)
            .require("code", self.code.as_str())
            .optional("redirect_url", self.redirect_uri.as_deref());
        if let Some(content_type) = self.content_type.as_deref() {
            spec = spec.header(
                CONTENT_TYPE,
                or_default(Some(content_type), defaults::CONTENT_TYPE),
            )?;
        }
        Ok(spec)
    }

    /// Validate, send once, and hand the response to the configured handler.
    pub async fn send<T>(self, transport: &T) -> Result<H::Output>
    where
        T: Transport + ?Sized,
    {
        let spec = self.prepare()?;
        let response = spec.send(transport).await?;
        self.handler.handle(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AccessTokenRequest {
        AccessTokenRequest::new(
            "https://auth.example.com/token",
            Credentials::new("abc", "xyz"),
            "the-code",
        )
    }

    #[test]
    fn test_prepare_defaults() {
        let spec = request().prepare().unwrap();
        assert_eq!(spec.method(), &Method::POST);
        assert_eq!(spec.param("grant_type"), Some("authorization_code"));
        assert_eq!(spec.param("code"), Some("the-code"));
        assert_eq!(spec.param("redirect_url"), None);
        assert_eq!(spec.header_value("Authorization"), Some("Basic YWJjOnh5eg=="));
        assert_eq!(spec.header_value("Content-Type"), None);
    }

    #[test]
    fn test_prepare_with_options() {
        let spec = request()
            .with_grant_type("custom_grant")
            .with_redirect_uri("http://localhost:8080/callback")
            .with_content_type("")
            .prepare()
            .unwrap();
        assert_eq!(spec.param("grant_type"), Some("custom_grant"));
        assert_eq!(
            spec.optional_params().get("redirect_url").map(String::as_str),
            Some("http://localhost:8080/callback")
        );
        assert_eq!(spec.header_value("content-type"), Some("application/json"));
    }

    #[test]
    fn test_blank_grant_type_uses_default() {
        let spec = request().with_grant_type("   ").prepare().unwrap();
        assert_eq!(spec.param("grant_type"), Some("authorization_code"));
    }

    #[test]
    fn test_validation_order() {
        let mut req = request();
        req.server_url = " ".into();
        req.credentials = Credentials::default();
        req.code = String::new();
        assert!(matches!(req.prepare(), Err(Error::ServerUrl(_))));

        let mut req = request();
        req.credentials.client_id = String::new();
        req.code = String::new();
        assert!(matches!(req.prepare(), Err(Error::ClientKey)));

        let mut req = request();
        req.credentials.client_secret = String::new();
        req.code = String::new();
        assert!(matches!(req.prepare(), Err(Error::SecretKey)));

        let mut req = request();
        req.code = "\t".into();
        assert!(matches!(req.prepare(), Err(Error::CodeEmpty)));
    }
}
