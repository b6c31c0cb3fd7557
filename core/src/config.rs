//! Client configuration.
//!
//! A `ClientConfig` is built once, handed to `ApiClient::new`, and is
//! read-only from then on. It can be assembled with the builder methods,
//! deserialized from a config document, or read from the environment.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

pub const DEFAULT_USER_AGENT: &str = concat!("client-sdk/", env!("CARGO_PKG_VERSION"), " (Rust)");

pub const ENV_BASE_URL: &str = "CLIENT_SDK_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "CLIENT_SDK_TIMEOUT_MS";
pub const ENV_BEARER_TOKEN: &str = "CLIENT_SDK_BEARER_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    headers: Vec<(String, String)>,
    bearer_token: Option<String>,
    user_agent: String,
}

/// On-disk shape of a `ClientConfig`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: String,
    #[serde(default)]
    timeout_ms: Option<u64>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    bearer_token: Option<String>,
    #[serde(default)]
    user_agent: Option<String>,
}

impl From<ConfigFile> for ClientConfig {
    fn from(file: ConfigFile) -> Self {
        let mut config =
            ClientConfig::new(file.base_url).timeout_ms(file.timeout_ms.unwrap_or(0));
        for (name, value) in file.headers {
            config = config.header(name, value);
        }
        if let Some(token) = file.bearer_token {
            config = config.bearer_token(token);
        }
        if let Some(agent) = file.user_agent {
            config = config.user_agent(agent);
        }
        config
    }
}

impl ClientConfig {
    /// Trailing slashes are trimmed, so `https://host///` becomes `https://host`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
            bearer_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Read the config from `CLIENT_SDK_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::InvalidConfig(format!("{ENV_BASE_URL} is not set")))?;
        let mut config = Self::new(base_url);

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms = raw.trim().parse::<u64>().map_err(|e| {
                ApiError::InvalidConfig(format!("{ENV_TIMEOUT_MS}='{raw}': {e}"))
            })?;
            config = config.timeout_ms(ms);
        }
        if let Some(token) = lookup(ENV_BEARER_TOKEN) {
            config = config.bearer_token(token);
        }
        Ok(config)
    }

    /// A zero timeout falls back to the 30s default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
        self
    }

    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    /// Add a header override. Overrides win over the built-in defaults and
    /// over the bearer token; a later override replaces an earlier one.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn overrides(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Defaults, then auth, then caller overrides. Header names compare
    /// case-insensitively, so `content-type` replaces `Content-Type`.
    pub fn header_map(&self) -> Result<HeaderMap, ApiError> {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        map.insert(USER_AGENT, header_value(USER_AGENT.as_str(), &self.user_agent)?);

        if let Some(token) = &self.bearer_token {
            map.insert(
                AUTHORIZATION,
                header_value(AUTHORIZATION.as_str(), &format!("Bearer {token}"))?,
            );
        }

        for (name, value) in &self.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader { name: name.clone() })?;
            map.insert(header, header_value(name, value)?);
        }
        Ok(map)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ClientConfig::new("https://api.example.com///");
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new("http://localhost:3000");
        assert_eq!(config.request_timeout(), Duration::from_millis(30_000));

        let headers = config.header_map().unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[USER_AGENT], DEFAULT_USER_AGENT);
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config = ClientConfig::new("http://x").timeout_ms(0);
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
        let config = ClientConfig::new("http://x").timeout_ms(250);
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn caller_header_wins_case_insensitively() {
        let headers = ClientConfig::new("http://x")
            .header("content-type", "application/vnd.pets+json")
            .header("X-Trace", "abc")
            .header("x-trace", "def")
            .header_map()
            .unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/vnd.pets+json");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers["x-trace"], "def");
    }

    #[test]
    fn bearer_token_injects_authorization() {
        let headers = ClientConfig::new("http://x")
            .bearer_token("s3cret")
            .header_map()
            .unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer s3cret");

        let headers = ClientConfig::new("http://x")
            .bearer_token("s3cret")
            .header("Authorization", "Basic Zm9vOmJhcg==")
            .header_map()
            .unwrap();
        assert_eq!(headers[AUTHORIZATION], "Basic Zm9vOmJhcg==");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let err = ClientConfig::new("http://x")
            .header("bad header", "v")
            .header_map()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { name } if name == "bad header"));
    }

    #[test]
    fn deserializes_from_json() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "base_url": "https://api.example.com/",
                "timeout_ms": 1500,
                "headers": {"X-Client": "cli"},
                "bearer_token": "t"
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.request_timeout(), Duration::from_millis(1500));
        assert_eq!(config.overrides(), &[("X-Client".to_string(), "cli".to_string())]);
        assert_eq!(config.header_map().unwrap()[AUTHORIZATION], "Bearer t");
    }

    #[test]
    fn deserialize_without_timeout_uses_default() {
        let config: ClientConfig = serde_json::from_str(r#"{"base_url":"http://x"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("http://x"));
    }

    #[test]
    fn deserialize_rejects_unknown_fields() {
        let result: Result<ClientConfig, _> =
            serde_json::from_str(r#"{"base_url":"http://x","retries":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn from_lookup_reads_env_vars() {
        let config = ClientConfig::from_lookup(|key| match key {
            ENV_BASE_URL => Some("http://localhost:3000/".to_string()),
            ENV_TIMEOUT_MS => Some("750".to_string()),
            ENV_BEARER_TOKEN => Some("tok".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000");
        assert_eq!(config.request_timeout(), Duration::from_millis(750));
        assert_eq!(config.header_map().unwrap()[AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn from_lookup_requires_base_url() {
        let err = ClientConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn from_lookup_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(|key| match key {
            ENV_BASE_URL => Some("http://x".to_string()),
            ENV_TIMEOUT_MS => Some("soon".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(msg) if msg.contains("soon")));
    }
}
