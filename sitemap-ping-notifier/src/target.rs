use crate::error::{PingError, Result};
use serde::Serialize;
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Built-in search engine endpoints, pinged in this order.
///
/// Each endpoint is a URL prefix; the encoded sitemap URL is appended to it.
pub const DEFAULT_TARGETS: &[(&str, &str)] = &[
    ("Google", "https://www.google.com/ping?sitemap="),
    ("Bing", "https://www.bing.com/ping?sitemap="),
    ("Yandex", "https://yandex.com/ping?sitemap="),
];

/// A search engine (or any other service) that accepts sitemap pings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingTarget {
    pub name: String,
    pub endpoint: String,
}

impl PingTarget {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    /// The built-in target table.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_TARGETS
            .iter()
            .map(|(name, endpoint)| Self::new(*name, *endpoint))
            .collect()
    }

    /// Parse a `NAME=URL` pair as given on the command line.
    ///
    /// The URL must be absolute; it is used as a prefix exactly like the
    /// built-in endpoints, so it normally ends with `?sitemap=`.
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let (name, endpoint) = spec
            .split_once('=')
            .ok_or_else(|| PingError::InvalidTarget(spec.to_string()))?;

        let name = name.trim();
        let endpoint = endpoint.trim();
        if name.is_empty() || endpoint.is_empty() {
            return Err(PingError::InvalidTarget(spec.to_string()));
        }

        Url::parse(endpoint).map_err(|e| PingError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

        Ok(Self::new(name, endpoint))
    }

    /// Build the ping URL for an absolute sitemap URL.
    pub fn ping_url(&self, sitemap_url: &str) -> String {
        format!("{}{}", self.endpoint, encode_query_value(sitemap_url))
    }
}

/// Percent-encode a value for use inside a query string.
pub fn encode_query_value(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
