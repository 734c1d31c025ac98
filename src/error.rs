use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("server url error: {0}")]
    ServerUrl(String),

    #[error("client key is not set")]
    ClientKey,

    #[error("client secret is not set")]
    SecretKey,

    #[error("authorization code is empty")]
    CodeEmpty,

    #[error("refresh token must not be empty")]
    RefreshTokenEmpty,

    #[error("request server url error: {0}")]
    RequestServerUrl(String),

    #[error("the server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors raised while building a request, before any network I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::ServerUrl(_)
                | Error::ClientKey
                | Error::SecretKey
                | Error::CodeEmpty
                | Error::RefreshTokenEmpty
                | Error::InvalidHeader(_)
        )
    }

    /// HTTP status code carried by a [`Error::Status`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
