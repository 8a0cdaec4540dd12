//! Process-wide configuration, loaded once from the environment at startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use crate::error::{RelayError, Result};
use crate::fetch::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://gmgn.ai/defi/quotation";
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_BACKOFF_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret compared verbatim against the inbound `x-api-key` header.
    pub api_key: String,
    /// Reserved for upstream proxy rotation; unused by current routes.
    pub proxy_source_url: Option<String>,
    pub base_url: Url,
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RelayError::Config("API_KEY must be set and non-empty".into()))?;

        let raw_base = env::var("GMGN_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_base)
            .map_err(|e| RelayError::Config(format!("invalid GMGN_BASE_URL `{raw_base}`: {e}")))?;
        if base_url.host_str().is_none() {
            return Err(RelayError::Config(format!(
                "GMGN_BASE_URL `{raw_base}` has no host"
            )));
        }

        let max_attempts: u32 = env_parse("FETCH_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(RelayError::Config(
                "FETCH_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }
        let backoff_ms: u64 = env_parse("FETCH_BACKOFF_MS", DEFAULT_BACKOFF_MS)?;

        Ok(Self {
            api_key,
            proxy_source_url: env::var("PROXY_SOURCE_URL").ok().filter(|s| !s.is_empty()),
            base_url,
            max_attempts,
            backoff_ms,
        })
    }

    /// Host the identity rotator pins into the `host` header.
    pub fn provider_host(&self) -> &str {
        // Presence is validated in `from_env`.
        self.base_url.host_str().unwrap_or_default()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay_ms: self.backoff_ms,
        }
    }
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|e| RelayError::Config(format!("invalid {name} `{raw}`: {e}"))),
    }
}
