//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Request
//! handling never reads process-wide environment variables.

use std::time::Duration;

use reqwest::Url;

use crate::constants::{DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::{IdeaError, IdeaResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: Url,
    request_timeout: Duration,
    stale_time: Option<Duration>,
}

impl CoreConfig {
    pub fn new(
        api_base_url: Url,
        request_timeout: Duration,
        stale_time: Option<Duration>,
    ) -> IdeaResult<Self> {
        if api_base_url.cannot_be_a_base() {
            return Err(IdeaError::InvalidInput(format!(
                "api base url cannot be used as a base: {api_base_url}"
            )));
        }
        if request_timeout.is_zero() {
            return Err(IdeaError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            request_timeout,
            stale_time,
        })
    }

    /// Configuration pointing at `api_base_url` with every other value defaulted.
    pub fn for_api(api_base_url: Url) -> IdeaResult<Self> {
        Self::new(api_base_url, DEFAULT_REQUEST_TIMEOUT, None)
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `None` keeps cached data until it is invalidated.
    pub fn stale_time(&self) -> Option<Duration> {
        self.stale_time
    }
}

/// Parse the API base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_API_URL`].
pub fn api_url_from_env_value(value: Option<String>) -> IdeaResult<Url> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let url = Url::parse(&value)
        .map_err(|e| IdeaError::InvalidInput(format!("invalid api url {value:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(IdeaError::InvalidInput(format!(
            "api url must use http or https, got {other}"
        ))),
    }
}

/// Parse a whole number of seconds from an optional string value.
///
/// Returns `Ok(None)` for a missing or blank value.
pub fn secs_from_env_value(name: &str, value: Option<String>) -> IdeaResult<Option<Duration>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            v.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| IdeaError::InvalidInput(format!("{name} must be whole seconds, got {v:?}")))
        })
        .transpose()
}
