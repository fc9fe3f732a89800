//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Environment variable consulted by [`RpcConfig::from_env`].
pub const PROXY_ENV_VAR: &str = "http_proxy";

/// How outbound requests reach the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyConfig {
    /// Use whatever proxy the system environment specifies.
    #[default]
    System,
    /// Route every request through this proxy URL.
    Explicit(String),
    /// Connect directly.
    Disabled,
}

impl ProxyConfig {
    /// Interpret the value of the proxy environment variable.
    ///
    /// `auto` selects system discovery; any other non-empty value is an
    /// explicit proxy URL.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("auto") => ProxyConfig::System,
            Some(url) => ProxyConfig::Explicit(url.to_string()),
        }
    }
}

/// Configuration for the RPC client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Endpoint the JSON-RPC requests are POSTed to.
    pub url: String,
    /// Whole-request timeout. Expiry surfaces as a transport error.
    #[serde(rename = "timeout_ms", deserialize_with = "duration_ms")]
    pub timeout: Duration,
    /// Proxy selection.
    pub proxy: ProxyConfig,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(30),
            proxy: ProxyConfig::System,
            user_agent: concat!("ledgerlink/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RpcConfig {
    /// Config for `url` with defaults for everything else.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Config for `url`, taking the proxy from the `http_proxy` variable.
    pub fn from_env(url: impl Into<String>) -> Self {
        let proxy = std::env::var(PROXY_ENV_VAR).ok();
        Self::new(url).with_proxy(ProxyConfig::from_env_value(proxy.as_deref()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Timeouts are written in milliseconds in config files.
fn duration_ms<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    u64::deserialize(d).map(Duration::from_millis)
}
