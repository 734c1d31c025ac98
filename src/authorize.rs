use http::Method;
use url::Url;

use crate::defaults;
use crate::error::{Error, Result};
use crate::request::{is_blank, or_default, parse_server_url, RequestSpec};

/// Builds the URL a user agent is redirected to in order to authorize the client.
///
/// No request is made; the URL itself is the result.
///
/// ```
/// use oauth2_client::AuthorizeUrl;
///
/// let url = AuthorizeUrl::new("https://auth.example.com/authorize", "my-client")
///     .with_redirect_uri("http://localhost:8080/callback")
///     .with_state("af0ifjsldkj")
///     .build()
///     .unwrap();
/// assert!(url.as_str().contains("client_id=my-client"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthorizeUrl {
    pub server_url: String,
    pub client_id: String,
    /// Defaults to `code`.
    pub response_type: Option<String>,
    /// Defaults to `get_user_info`.
    pub scope: Option<String>,
    pub state: Option<String>,
    pub redirect_uri: Option<String>,
}

impl AuthorizeUrl {
    pub fn new(server_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    /// Scopes as the provider expects them, usually space separated.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Opaque value echoed back on the redirect, used to detect CSRF.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn prepare(&self) -> Result<RequestSpec> {
        let server_url = parse_server_url(&self.server_url)?;

        let response_type = or_default(
            self.response_type.as_deref(),
            defaults::AUTHORIZE_RESPONSE_TYPE,
        );
        let scope = or_default(self.scope.as_deref(), defaults::AUTHORIZE_SCOPE).trim();

        if is_blank(&self.client_id) {
            return Err(Error::ClientKey);
        }

        Ok(RequestSpec::new(Method::GET, server_url)
            .optional("redirect_uri", self.redirect_uri.as_deref())
            .require("response_type", response_type)
            .require("scope", scope)
            .optional("state", self.state.as_deref())
            .require("client_id", self.client_id.as_str()))
    }

    pub fn build(&self) -> Result<Url> {
        Ok(self.prepare()?.url())
    }
}
