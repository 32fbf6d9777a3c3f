//! Panel configuration

use anyhow::Result;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Panel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    /// Reports API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session storage configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Panel HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Monitoring configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl PanelConfig {
    /// Load configuration from file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: PanelConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            server: ServerConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

/// Upstream reports API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the reports API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Path to the session file
    #[serde(default = "default_session_path")]
    pub path: String,
}

fn default_session_path() -> String {
    "session.json".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

/// Panel HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Entry page the panel redirects to when the session is invalidated
    #[serde(default = "default_entry_path")]
    pub entry_path: String,
}

fn default_bind() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

fn default_entry_path() -> String {
    "/index.html".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            entry_path: default_entry_path(),
        }
    }
}

/// Monitoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            prometheus_enabled: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PanelConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.server.entry_path, "/index.html");
        assert!(config.monitoring.prometheus_enabled);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: PanelConfig = toml::from_str(
            r#"
[api]
base_url = "https://reports.example.org"

[server]
entry_path = "/login.html"
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://reports.example.org");
        // Untouched sections keep their defaults
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.server.entry_path, "/login.html");
        assert_eq!(config.session.path, "session.json");
    }
}
