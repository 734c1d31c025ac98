use serde::{Deserialize, Serialize};

use crate::auth::Credentials;
use crate::error::Result;

/// Everything needed to talk to one OAuth2 provider.
///
/// Endpoints that are not configured stay empty and surface as
/// [`Error::ServerUrl`](crate::Error::ServerUrl) when the matching operation
/// is attempted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub authorize_url: String,
    pub token_url: String,
    /// Falls back to `token_url` when empty.
    pub refresh_url: String,
    pub revoke_url: String,
    pub userinfo_url: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl ProviderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read `<PREFIX>_AUTHORIZE_URL`, `<PREFIX>_TOKEN_URL`, `<PREFIX>_CLIENT_ID`
    /// and friends. Unset variables are left empty.
    pub fn from_env(prefix: &str) -> Self {
        let var = |name: &str| std::env::var(format!("{prefix}_{name}")).unwrap_or_default();
        Self {
            authorize_url: var("AUTHORIZE_URL"),
            token_url: var("TOKEN_URL"),
            refresh_url: var("REFRESH_URL"),
            revoke_url: var("REVOKE_URL"),
            userinfo_url: var("USERINFO_URL"),
            client_id: var("CLIENT_ID"),
            client_secret: var("CLIENT_SECRET"),
            redirect_uri: var("REDIRECT_URI"),
            scope: var("SCOPE"),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.client_id, &self.client_secret)
    }

    pub(crate) fn refresh_endpoint(&self) -> &str {
        if self.refresh_url.trim().is_empty() {
            &self.token_url
        } else {
            &self.refresh_url
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("refresh_url", &self.refresh_url)
            .field("revoke_url", &self.revoke_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
