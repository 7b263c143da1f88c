use std::time::Duration;

use crate::errors::ConfigError;
use crate::presentation::LinkPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STOREFRONT_DOMAIN: &str = "caviaarmode.com";

const API_BASE_URL_KEY: &str = "CHAT_API_BASE_URL";
const TIMEOUT_KEY: &str = "CHAT_REQUEST_TIMEOUT_SECS";
const STOREFRONT_KEY: &str = "CHAT_STOREFRONT_DOMAIN";

/// Where the widget talks to and how long it waits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Backend origin without a trailing slash.
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub storefront_domain: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storefront_domain: DEFAULT_STOREFRONT_DOMAIN.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Reads the `CHAT_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = match lookup(API_BASE_URL_KEY) {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.api_base_url,
        };

        let request_timeout = match lookup(TIMEOUT_KEY) {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.request_timeout,
        };

        let storefront_domain = match lookup(STOREFRONT_KEY) {
            Some(raw) if !raw.trim().is_empty() => raw.trim().to_lowercase(),
            Some(raw) => {
                return Err(ConfigError::InvalidValue {
                    key: STOREFRONT_KEY,
                    value: raw,
                    reason: "must not be empty".to_string(),
                })
            }
            None => defaults.storefront_domain,
        };

        Ok(Self { api_base_url, request_timeout, storefront_domain })
    }

    pub fn chat_endpoint(&self) -> String {
        format!("{}/api/chat", self.api_base_url)
    }

    pub fn link_policy(&self) -> LinkPolicy {
        LinkPolicy::new(&self.storefront_domain)
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match url::Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        Ok(parsed) => Err(ConfigError::InvalidValue {
            key: API_BASE_URL_KEY,
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => Err(ConfigError::InvalidValue {
            key: API_BASE_URL_KEY,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: TIMEOUT_KEY,
            value: raw.to_string(),
            reason: "must be at least 1 second".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::InvalidValue {
            key: TIMEOUT_KEY,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
