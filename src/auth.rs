use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;

use crate::error::{Error, Result};
use crate::request::is_blank;

/// Client id and secret issued by the authorization server.
///
/// Only ever turned into a `Basic` authorization header; nothing here is
/// written anywhere else.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Validate both halves and compute the `Basic` header value.
    ///
    /// A blank client id is reported before a blank secret.
    pub fn authorization(&self) -> Result<String> {
        if is_blank(&self.client_id) {
            return Err(Error::ClientKey);
        }
        if is_blank(&self.client_secret) {
            return Err(Error::SecretKey);
        }
        Ok(basic_authorization(&self.client_id, &self.client_secret))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

/// An access token presented to a resource server.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn authorization(&self) -> String {
        bearer_authorization(&self.0)
    }
}

impl From<&str> for BearerToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([redacted])")
    }
}

/// `Basic <base64(id:secret)>`, standard alphabet with padding.
pub fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

/// `Bearer <token>`; the token is used verbatim.
pub fn bearer_authorization(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization() {
        assert_eq!(basic_authorization("abc", "xyz"), "Basic YWJjOnh5eg==");
    }

    #[test]
    fn test_bearer_authorization() {
        assert_eq!(bearer_authorization("tok123"), "Bearer tok123");
        assert_eq!(BearerToken::new("tok123").authorization(), "Bearer tok123");
    }

    #[test]
    fn test_credentials_validation_order() {
        assert!(matches!(
            Credentials::new("  ", "").authorization(),
            Err(Error::ClientKey)
        ));
        assert!(matches!(
            Credentials::new("abc", " \t").authorization(),
            Err(Error::SecretKey)
        ));
        assert_eq!(
            Credentials::new("abc", "xyz").authorization().unwrap(),
            "Basic YWJjOnh5eg=="
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = format!("{:?}", Credentials::new("abc", "xyz"));
        assert!(creds.contains("abc"));
        assert!(!creds.contains("xyz"));

        let token = format!("{:?}", BearerToken::new("tok123"));
        assert!(!token.contains("tok123"));
    }
}
