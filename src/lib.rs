//! # oauth2-client
//!
//! Request builders for the OAuth2 authorization code grant.
//!
//! ## Overview
//!
//! Each operation is a plain configuration value. Calling `prepare` runs a
//! fixed sequence of validation steps and returns either a complete
//! [`RequestSpec`] or the first error found. Calling `send` validates, makes
//! exactly one HTTP call through a [`Transport`] and hands the response to a
//! [`ResponseHandler`]. Invalid input never reaches the network.
//!
//! - [`AuthorizeUrl`]: the URL to redirect a user agent to
//! - [`AccessTokenRequest`]: exchange an authorization code for a token
//! - [`RefreshTokenRequest`]: exchange a refresh token for a new token
//! - [`RevokeTokenRequest`]: invalidate a token
//! - [`UserInfoRequest`]: fetch account data with a bearer token
//!
//! [`Client`] bundles a [`ProviderConfig`] with a transport for the common
//! case of talking to one provider.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use oauth2_client::{AccessTokenRequest, AuthorizeUrl, Credentials, HttpTransport, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let url = AuthorizeUrl::new("https://auth.example.com/authorize", "my-client")
//!         .with_redirect_uri("http://localhost:8080/callback")
//!         .with_state("xyz")
//!         .build()?;
//!     println!("Visit {url}");
//!
//!     // ... the provider redirects back with ?code=...
//!     let token = AccessTokenRequest::new(
//!         "https://auth.example.com/token",
//!         Credentials::new("my-client", "my-secret"),
//!         "code-from-redirect",
//!     )
//!     .send(&HttpTransport::default())
//!     .await?;
//!     println!("Expires in {:?}s", token.expires_in);
//!     Ok(())
//! }
//! ```
//!
//! Nothing here stores tokens, refreshes them automatically, or retries.

mod auth;
mod authorize;
mod client;
mod config;
mod error;
mod handler;
mod refresh;
mod request;
mod revoke;
mod token;
mod transport;
mod userinfo;

pub mod defaults;
pub mod testutils;

pub use auth::{basic_authorization, bearer_authorization, BearerToken, Credentials};
pub use authorize::AuthorizeUrl;
pub use client::Client;
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use handler::{
    handler_fn, AccessTokenResponse, HandlerFn, RawBody, ResponseHandler, TokenResponseHandler,
    UserInfo, UserInfoHandler,
};
pub use refresh::RefreshTokenRequest;
pub use request::RequestSpec;
pub use revoke::RevokeTokenRequest;
pub use token::AccessTokenRequest;
pub use transport::{HttpTransport, HttpTransportConfig, Transport};
pub use userinfo::UserInfoRequest;
