//! Feature service configuration.
//!
//! The request parameters are defined in `config/vworld.toml`, embedded at
//! compile time. Only the access key, the endpoint URL, and the
//! diagnostics flag can be overridden from the environment.

use serde::Deserialize;

/// Embedded service definition.
const SERVICE_TOML: &str = include_str!("../config/vworld.toml");

/// Environment variable holding the service access key.
pub const API_KEY_ENV: &str = "VWORLD_API_KEY";
/// Environment variable overriding the service URL.
pub const URL_ENV: &str = "VWORLD_WFS_URL";
/// Environment variable enabling run diagnostics.
pub const DEBUG_ENV: &str = "PARCEL_MAP_DEBUG";

/// Fixed parameter set sent with every `GetFeature` request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// `GetFeature` endpoint.
    pub url: String,
    /// Domain the key was issued for.
    pub domain: String,
    /// Feature type (cadastral layer) name.
    pub typename: String,
    /// Feature cap per request. There is no continuation.
    pub max_features: u32,
    /// `results` (not `hits`).
    pub result_type: String,
    /// Output coordinate reference system.
    pub srs_name: String,
    /// Output format.
    pub output: String,
    /// Access key.
    pub key: String,
    /// Whether runs report diagnostics (request URL, status, per-parcel
    /// lines).
    #[serde(default)]
    pub debug: bool,
}

impl ServiceConfig {
    /// Returns the embedded service definition without environment
    /// overrides.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, a failure is a development error caught by
    /// the tests below.
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(SERVICE_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded service config: {e}"))
    }

    /// Returns the embedded definition with overrides from the process
    /// environment.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::embedded().with_overrides(|name| std::env::var(name).ok());

        if config.key.is_empty() {
            log::warn!("{API_KEY_ENV} is not set; the feature service will likely reject requests");
        }

        config
    }

    /// Applies overrides read through `lookup`.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|s| !s.trim().is_empty()) {
            self.key = key.trim().to_string();
        }
        if let Some(url) = lookup(URL_ENV).filter(|s| !s.trim().is_empty()) {
            self.url = url.trim().to_string();
        }
        if let Some(flag) = lookup(DEBUG_ENV) {
            self.debug = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }
}
