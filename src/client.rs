use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::authorize::AuthorizeUrl;
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::handler::{AccessTokenResponse, TokenResponseHandler, UserInfo, UserInfoHandler};
use crate::refresh::RefreshTokenRequest;
use crate::revoke::RevokeTokenRequest;
use crate::token::AccessTokenRequest;
use crate::transport::{HttpTransport, Transport};
use crate::userinfo::UserInfoRequest;

/// One provider configuration plus a transport.
///
/// Each method builds a fresh request, so a `Client` can be shared freely;
/// it holds no tokens and never refreshes on its own.
#[derive(Clone)]
pub struct Client {
    config: ProviderConfig,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// A client that talks HTTP through `reqwest`.
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_transport(config, HttpTransport::default())
    }

    pub fn with_transport(config: ProviderConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The authorization URL, with the configured redirect URI and scope.
    pub fn authorize_url(&self, state: Option<&str>) -> Result<Url> {
        let mut request = AuthorizeUrl::new(&self.config.authorize_url, &self.config.client_id)
            .with_redirect_uri(&self.config.redirect_uri)
            .with_scope(&self.config.scope);
        if let Some(state) = state {
            request = request.with_state(state);
        }
        request.build()
    }

    pub async fn exchange_code(&self, code: &str) -> Result<AccessTokenResponse> {
        debug!("Exchanging authorization code");
        AccessTokenRequest::new(&self.config.token_url, self.config.credentials(), code)
            .with_redirect_uri(&self.config.redirect_uri)
            .send(self.transport.as_ref())
            .await
    }

    /// Raw body of the refresh response.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Bytes> {
        debug!("Refreshing access token");
        RefreshTokenRequest::new(
            self.config.refresh_endpoint(),
            self.config.credentials(),
            refresh_token,
        )
        .send(self.transport.as_ref())
        .await
    }

    /// Refresh and decode the new token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AccessTokenResponse> {
        RefreshTokenRequest::new(
            self.config.refresh_endpoint(),
            self.config.credentials(),
            refresh_token,
        )
        .with_response_handler(TokenResponseHandler)
        .send(self.transport.as_ref())
        .await
    }

    pub async fn revoke(&self, access_token: &str) -> Result<Bytes> {
        debug!("Revoking access token");
        RevokeTokenRequest::new(
            &self.config.revoke_url,
            self.config.credentials(),
            access_token,
        )
        .send(self.transport.as_ref())
        .await
    }

    /// Raw body of the user-info response.
    pub async fn user_info(&self, access_token: &str) -> Result<Bytes> {
        UserInfoRequest::new(&self.config.userinfo_url, access_token)
            .send(self.transport.as_ref())
            .await
    }

    pub async fn user_profile(&self, access_token: &str) -> Result<UserInfo> {
        UserInfoRequest::new(&self.config.userinfo_url, access_token)
            .with_response_handler(UserInfoHandler)
            .send(self.transport.as_ref())
            .await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
