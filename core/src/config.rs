//! Client configuration and its providers.
//!
//! # Design
//! `ClientConfig` can be assembled in code, deserialized from TOML or read
//! from `SENDY_*` environment variables. Validation happens when a client is
//! built, so every provider goes through the same checks.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::observer::mask;
use crate::params::CustomFieldLayout;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct ClientConfig {
    pub url: String,
    pub api_key: String,
    pub brand_id: Option<String>,
    pub timeout: Duration,
    pub custom_field_layout: CustomFieldLayout,
}

/// On-disk shape: the timeout is given in whole seconds.
#[derive(Deserialize)]
struct RawConfig {
    url: String,
    api_key: String,
    #[serde(default)]
    brand_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default)]
    custom_field_layout: CustomFieldLayout,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl From<RawConfig> for ClientConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            url: raw.url,
            api_key: raw.api_key,
            brand_id: raw.brand_id.filter(|b| !b.is_empty()),
            timeout: Duration::from_secs(raw.timeout_secs),
            custom_field_layout: raw.custom_field_layout,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            brand_id: None,
            timeout: DEFAULT_TIMEOUT,
            custom_field_layout: CustomFieldLayout::default(),
        }
    }

    pub fn with_brand_id(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_custom_field_layout(mut self, layout: CustomFieldLayout) -> Self {
        self.custom_field_layout = layout;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Reads `SENDY_URL`, `SENDY_API_KEY`, `SENDY_BRAND_ID` and
    /// `SENDY_TIMEOUT` (seconds).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("SENDY_URL").ok_or(ConfigError::MissingEnv("SENDY_URL"))?;
        let api_key = lookup("SENDY_API_KEY").ok_or(ConfigError::MissingEnv("SENDY_API_KEY"))?;
        let mut config = Self::new(url, api_key);

        if let Some(brand_id) = lookup("SENDY_BRAND_ID").filter(|b| !b.is_empty()) {
            config.brand_id = Some(brand_id);
        }
        if let Some(value) = lookup("SENDY_TIMEOUT") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "SENDY_TIMEOUT",
                value: value.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Checks the configuration and returns a copy with the base URL
    /// normalized to end in exactly one `/`.
    pub fn validate(&self) -> Result<Self, ConfigError> {
        let trimmed = self.url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Self {
            url: format!("{trimmed}/"),
            ..self.clone()
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("api_key", &mask(&self.api_key))
            .field("brand_id", &self.brand_id)
            .field("timeout", &self.timeout)
            .field("custom_field_layout", &self.custom_field_layout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn validate_normalizes_trailing_slashes() {
        for url in ["http://sendy.test", "http://sendy.test/", "http://sendy.test///"] {
            let config = ClientConfig::new(url, "key").validate().unwrap();
            assert_eq!(config.url, "http://sendy.test/");
        }
    }

    #[test]
    fn validate_rejects_empty_url() {
        for url in ["", "   ", "/"] {
            let err = ClientConfig::new(url, "key").validate().unwrap_err();
            assert!(matches!(err, ConfigError::EmptyUrl), "{url:?}");
        }
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let err = ClientConfig::new("http://sendy.test", "key")
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout));
    }

    #[test]
    fn toml_uses_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            url = "https://newsletter.example.com"
            api_key = "test-api-key"
            "#,
        )
        .unwrap();
        assert_eq!(config.brand_id, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.custom_field_layout, CustomFieldLayout::Flatten);
    }

    #[test]
    fn toml_reads_every_field() {
        let config = ClientConfig::from_toml_str(
            r#"
            url = "https://newsletter.example.com"
            api_key = "test-api-key"
            brand_id = "test-brand-id"
            timeout_secs = 5
            custom_field_layout = "nested"
            "#,
        )
        .unwrap();
        assert_eq!(config.brand_id.as_deref(), Some("test-brand-id"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.custom_field_layout, CustomFieldLayout::Nested);
    }

    #[test]
    fn toml_missing_api_key_fails() {
        let err = ClientConfig::from_toml_str(r#"url = "https://x""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn env_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SENDY_URL", "http://test-sendy-url.com"),
            ("SENDY_API_KEY", "test-api-key"),
            ("SENDY_BRAND_ID", "test-brand-id"),
            ("SENDY_TIMEOUT", "5"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.url, "http://test-sendy-url.com");
        assert_eq!(config.brand_id.as_deref(), Some("test-brand-id"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_lookup_errors() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("SENDY_URL")));

        let err = ClientConfig::from_lookup(|k| match k {
            "SENDY_TIMEOUT" => Some("soon".to_string()),
            _ => Some("x".to_string()),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: "SENDY_TIMEOUT", .. }));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ClientConfig::new("http://sendy.test", "0123456789abcdef");
        let printed = format!("{config:?}");
        assert!(!printed.contains("0123456789abcdef"));
        assert!(printed.contains("0123...cdef"));
    }
}
