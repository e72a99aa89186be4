//! `GetFeature` client for the cadastral feature service.
//!
//! Issues exactly one GET per call with the fixed parameter set from
//! [`ServiceConfig`]. There is no retry, no pagination beyond the
//! `maxFeatures` cap, and no request timeout.

use parcel_map_parcel_models::BoundingBox;

use crate::WfsError;
use crate::config::ServiceConfig;

/// Query parameter names, in the order they are sent.
pub const PARAM_NAMES: [&str; 8] = [
    "key",
    "domain",
    "typename",
    "bbox",
    "maxFeatures",
    "resultType",
    "srsName",
    "output",
];

/// Placeholder substituted for the access key in logged URLs.
const REDACTED: &str = "***";

/// Status and body exactly as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Final request URL with the access key redacted.
    pub url: String,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns the first `max_chars` characters of the body, decoded
    /// lossily, for diagnostics.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        String::from_utf8_lossy(&self.body)
            .chars()
            .take(max_chars)
            .collect()
    }
}

/// Thin wrapper around a [`reqwest::Client`] bound to one service.
#[derive(Debug, Clone)]
pub struct WfsClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl WfsClient {
    /// Builds a client with certificate verification on and no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WfsError::Transport`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: ServiceConfig) -> Result<Self, WfsError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("parcel-map/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Wraps an existing HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    /// Returns the service configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the query parameters for `bbox`, in [`PARAM_NAMES`] order.
    #[must_use]
    pub fn request_params(&self, bbox: &BoundingBox) -> Vec<(&'static str, String)> {
        let config = &self.config;
        let values = [
            config.key.clone(),
            config.domain.clone(),
            config.typename.clone(),
            bbox.to_string(),
            config.max_features.to_string(),
            config.result_type.clone(),
            config.srs_name.clone(),
            config.output.clone(),
        ];
        PARAM_NAMES.into_iter().zip(values).collect()
    }

    /// Sends one `GetFeature` request for `bbox`.
    ///
    /// Non-200 statuses are returned, not raised; the caller decides how
    /// to present them.
    ///
    /// # Errors
    ///
    /// Returns [`WfsError::Transport`] if the request cannot be completed.
    /// The error carries no URL, since the query string holds the key.
    pub async fn fetch(&self, bbox: &BoundingBox) -> Result<RawResponse, WfsError> {
        let params = self.request_params(bbox);

        log::debug!("Requesting parcels for bbox {bbox}");

        let resp = self
            .client
            .get(&self.config.url)
            .query(&params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status().as_u16();
        let url = redact_key(resp.url());
        let body = resp
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?
            .to_vec();

        log::debug!("GET {url} -> {status} ({} bytes)", body.len());

        Ok(RawResponse { status, url, body })
    }
}

/// Returns `url` with the `key` query parameter replaced.
fn redact_key(url: &reqwest::Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> WfsClient {
        let mut config = ServiceConfig::embedded();
        config.key = "TEST-KEY".to_string();
        WfsClient::with_client(reqwest::Client::new(), config)
    }

    #[test]
    fn builds_fixed_parameter_set() {
        let params = client().request_params(&BoundingBox::new(126.45, 36.78, 126.46, 36.79));
        let expected = [
            ("key", "TEST-KEY"),
            ("domain", "localhost"),
            ("typename", "dt_d002"),
            ("bbox", "126.45,36.78,126.46,36.79,EPSG:4326"),
            ("maxFeatures", "100"),
            ("resultType", "results"),
            ("srsName", "EPSG:4326"),
            ("output", "text/xml; subtype=gml/2.1.2"),
        ];
        assert_eq!(params.len(), expected.len());
        for ((name, value), (exp_name, exp_value)) in params.iter().zip(expected) {
            assert_eq!(*name, exp_name);
            assert_eq!(value, exp_value);
        }
    }

    #[test]
    fn redacts_access_key() {
        let url = reqwest::Url::parse(
            "https://api.vworld.kr/ned/wfs/getCtnlgsSpceWFS?key=SECRET&typename=dt_d002",
        )
        .unwrap();
        let redacted = redact_key(&url);
        assert!(!redacted.contains("SECRET"));
        assert!(redacted.contains("key=***") || redacted.contains("key=%2A%2A%2A"));
        assert!(redacted.contains("typename=dt_d002"));
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_key() {
        let mut config = ServiceConfig::embedded();
        config.key = "SECRET-KEY-123".to_string();
        config.url = "http://127.0.0.1:1/wfs".to_string();
        let client = WfsClient::new(config).unwrap();

        let err = client.fetch(&BoundingBox::FALLBACK).await.unwrap_err();
        assert!(matches!(err, WfsError::Transport(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }

    #[test]
    fn excerpt_truncates_by_chars() {
        let raw = RawResponse {
            status: 200,
            url: String::new(),
            body: "필지없음".as_bytes().to_vec(),
        };
        assert_eq!(raw.excerpt(2), "필지");
        assert_eq!(raw.excerpt(100), "필지없음");
    }
}
