//! Configuration for the OCR client
//!
//! Three plain fields supplied by the caller, optionally read from the
//! environment.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Endpoint used when no API path is configured
pub const DEFAULT_API_PATH: &str = "http://apis.baidu.com/apistore/idlocr/ocr";

/// Timeout applied when the configured value is `0`
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configured timeout value meaning "never time out"
pub const NO_TIMEOUT: i64 = -1;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "BAIDUOCR_APIKEY";

/// Environment variable overriding the endpoint
pub const ENV_API_PATH: &str = "BAIDUOCR_API_PATH";

/// Environment variable holding the timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "BAIDUOCR_TIMEOUT_MS";

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent in the `apikey` header. Not validated locally.
    pub api_key: String,
    /// API entrypoint. Empty means [`DEFAULT_API_PATH`].
    #[serde(default)]
    pub api_path: String,
    /// Request timeout in milliseconds.
    ///
    /// `0` uses [`DEFAULT_TIMEOUT`], [`NO_TIMEOUT`] disables the timeout.
    /// Any other negative value is a programming error.
    #[serde(default)]
    pub timeout_ms: i64,
}

impl ClientConfig {
    /// Create a configuration with just an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `BAIDUOCR_APIKEY`: API key (required)
    /// - `BAIDUOCR_API_PATH`: endpoint override (optional)
    /// - `BAIDUOCR_TIMEOUT_MS`: timeout in milliseconds (optional)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| ApiError::missing_env(ENV_API_KEY))?;
        let api_path = lookup(ENV_API_PATH).unwrap_or_default();

        let timeout_ms = match lookup(ENV_TIMEOUT_MS) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ApiError::config(format!("{ENV_TIMEOUT_MS} must be an integer, got {raw:?}"))
            })?,
            None => 0,
        };

        Ok(Self {
            api_key,
            api_path,
            timeout_ms,
        })
    }

    /// Builder-style method to set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Builder-style method to set the API path
    #[must_use]
    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    /// Builder-style method to set the timeout in milliseconds
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Endpoint the request is posted to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        if self.api_path.is_empty() {
            DEFAULT_API_PATH
        } else {
            &self.api_path
        }
    }

    /// Effective request timeout; `None` means no timeout.
    ///
    /// # Panics
    /// If `timeout_ms` is negative and not [`NO_TIMEOUT`].
    #[must_use]
    pub fn effective_timeout(&self) -> Option<Duration> {
        resolve_timeout(self.timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        let endpoint = self.endpoint();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ApiError::config("api_path must start with http:// or https://"));
        }

        Ok(())
    }
}

/// Map a configured timeout in milliseconds to the transport timeout.
///
/// # Panics
/// On negative values other than [`NO_TIMEOUT`]. Such a value can only come
/// from a caller bug and must not turn into some arbitrary network behavior.
#[must_use]
pub fn resolve_timeout(timeout_ms: i64) -> Option<Duration> {
    match timeout_ms {
        0 => Some(DEFAULT_TIMEOUT),
        NO_TIMEOUT => None,
        ms => match u64::try_from(ms) {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => panic!(
                "invalid OCR timeout {ms} ms: use 0 for the default, {NO_TIMEOUT} for no timeout, or a positive value"
            ),
        },
    }
}
