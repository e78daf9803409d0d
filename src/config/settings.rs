//! Gateway configuration settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;

/// Main configuration for the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server listening address
    pub listen_addr: SocketAddr,

    /// Log level configuration
    pub log_level: String,

    /// Path prefix under which backend services are exposed
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Mapping of logical service name to backend base URI
    #[serde(default)]
    pub routes: BTreeMap<String, String>,

    /// Session and credential configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Backend request timeout in seconds (time to response head)
    pub request_timeout: u64,

    /// HTTP client configuration
    #[serde(default)]
    pub http_client: HttpClientConfig,
}

/// Session and credential configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity-provider registration the relayed tokens belong to
    pub registration_id: String,

    /// Name of the browser session cookie
    pub session_cookie: String,

    /// What to do when an authenticated caller has no stored token
    pub credential_policy: CredentialPolicy,
}

/// Policy applied when no access token is stored for an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialPolicy {
    /// Forward the request without an Authorization header (logged)
    Forward,
    /// Reject the request with 401 before any backend call
    Require,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub max_idle_per_host: u32,

    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Enable TCP keepalive
    pub tcp_keepalive: bool,

    /// TCP keepalive interval in seconds
    pub tcp_keepalive_interval_secs: u64,
}

fn default_api_prefix() -> String {
    "/api/".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().unwrap(),
            log_level: "info".to_string(),
            api_prefix: default_api_prefix(),
            routes: BTreeMap::new(),
            auth: AuthConfig::default(),
            request_timeout: 30,
            http_client: HttpClientConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            registration_id: "idp".to_string(),
            session_cookie: "SESSION".to_string(),
            credential_policy: CredentialPolicy::Forward,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 50,
            idle_timeout_secs: 90,
            connect_timeout_secs: 10,
            tcp_keepalive: true,
            tcp_keepalive_interval_secs: 30,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: GatewayConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable overrides.
    /// Falls back to defaults when no config file exists at `path`.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::from_yaml_file(path)?
        } else {
            Self::default()
        };

        // Environment overrides for development and container deployments
        if let Ok(addr_str) = std::env::var("GATEWAY_LISTEN_ADDR") {
            if let Ok(addr) = addr_str.parse() {
                config.listen_addr = addr;
            }
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            config.log_level = log_level;
        }

        if let Ok(prefix) = std::env::var("GATEWAY_API_PREFIX") {
            config.api_prefix = prefix;
        }

        if let Ok(timeout) = std::env::var("GATEWAY_REQUEST_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                config.request_timeout = timeout;
            }
        }

        if let Ok(registration_id) = std::env::var("GATEWAY_REGISTRATION_ID") {
            config.auth.registration_id = registration_id;
        }

        if let Ok(cookie) = std::env::var("GATEWAY_SESSION_COOKIE") {
            config.auth.session_cookie = cookie;
        }

        if let Ok(policy) = std::env::var("GATEWAY_CREDENTIAL_POLICY") {
            match policy.to_lowercase().as_str() {
                "forward" => config.auth.credential_policy = CredentialPolicy::Forward,
                "require" => config.auth.credential_policy = CredentialPolicy::Require,
                other => {
                    return Err(anyhow::anyhow!(
                        "Invalid GATEWAY_CREDENTIAL_POLICY '{}' (expected 'forward' or 'require')",
                        other
                    ))
                }
            }
        }

        // Routes can be supplied as GATEWAY_ROUTE_<NAME>=<uri> for quick setups
        for (key, value) in std::env::vars() {
            if let Some(name) = key.strip_prefix("GATEWAY_ROUTE_") {
                config.routes.insert(name.to_lowercase(), value);
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate invariants that the rest of the gateway relies on
    pub fn validate(&self) -> Result<()> {
        if !self.api_prefix.starts_with('/') || !self.api_prefix.ends_with('/') {
            return Err(anyhow::anyhow!(
                "api_prefix must start and end with '/' (got '{}')",
                self.api_prefix
            ));
        }

        if self.request_timeout == 0 {
            return Err(anyhow::anyhow!("request_timeout must be greater than zero"));
        }

        Ok(())
    }
}
