use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::Transport;

pub(crate) const AUTHORIZATION: &str = "Authorization";
pub(crate) const CONTENT_TYPE: &str = "Content-Type";

/// True when the value is empty after trimming whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// The configured value unless it is missing or blank.
pub(crate) fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !is_blank(v) => v,
        _ => default,
    }
}

/// First step of every request pipeline.
pub(crate) fn parse_server_url(raw: &str) -> Result<Url> {
    if is_blank(raw) {
        return Err(Error::ServerUrl("server url is blank".to_string()));
    }
    let url = Url::parse(raw.trim()).map_err(|e| Error::ServerUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::ServerUrl(format!("{raw} is not an absolute url")));
    }
    Ok(url)
}

/// A fully validated request, ready to hand to a [`Transport`].
///
/// Only the request builders in this crate produce one, and only after every
/// validation step passed. Query parameters are kept sorted by name so the
/// final URL is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: Method,
    server_url: Url,
    required_params: BTreeMap<String, String>,
    optional_params: BTreeMap<String, String>,
    headers: HeaderMap,
}

impl RequestSpec {
    pub(crate) fn new(method: Method, server_url: Url) -> Self {
        Self {
            method,
            server_url,
            required_params: BTreeMap::new(),
            optional_params: BTreeMap::new(),
            headers: HeaderMap::new(),
        }
    }

    pub(crate) fn require(mut self, name: &str, value: impl Into<String>) -> Self {
        self.required_params.insert(name.to_string(), value.into());
        self
    }

    /// Attach an optional parameter; blank values are left out.
    pub(crate) fn optional(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !is_blank(v)) {
            self.optional_params
                .insert(name.to_string(), value.to_string());
        }
        self
    }

    pub(crate) fn header(self, name: &str, value: &str) -> Result<Self> {
        self.insert_header(name, value, false)
    }

    /// Like [`RequestSpec::header`] but hides the value from `Debug` output.
    pub(crate) fn sensitive_header(self, name: &str, value: &str) -> Result<Self> {
        self.insert_header(name, value, true)
    }

    fn insert_header(mut self, name: &str, value: &str, sensitive: bool) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
        value.set_sensitive(sensitive);
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The server URL as configured, without the request parameters.
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn required_params(&self) -> &BTreeMap<String, String> {
        &self.required_params
    }

    pub fn optional_params(&self) -> &BTreeMap<String, String> {
        &self.optional_params
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Look up a parameter, required or optional.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.required_params
            .get(name)
            .or_else(|| self.optional_params.get(name))
            .map(String::as_str)
    }

    /// Look up a header value; names are case-insensitive.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The server URL with every parameter serialized into its query string.
    ///
    /// Pairs already present on the server URL keep their order, repeats
    /// included. A request parameter replaces every existing pair of the
    /// same name and is appended after them, sorted by name.
    pub fn url(&self) -> Url {
        let mut params = self.required_params.clone();
        params.extend(self.optional_params.clone());

        let mut pairs: Vec<(String, String)> = self
            .server_url
            .query_pairs()
            .into_owned()
            .filter(|(name, _)| !params.contains_key(name))
            .collect();
        pairs.extend(params);

        let mut url = self.server_url.clone();
        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs.iter());
        }
        url
    }

    /// Issue the request exactly once through `transport`.
    pub async fn send<T>(&self, transport: &T) -> Result<reqwest::Response>
    where
        T: Transport + ?Sized,
    {
        debug!(
            "Sending {} request to {}{}",
            self.method,
            self.server_url.origin().ascii_serialization(),
            self.server_url.path()
        );
        transport
            .perform(self.method.clone(), self.url(), self.headers.clone())
            .await
    }
}
