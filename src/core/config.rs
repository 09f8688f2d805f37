//! Configuration management for the MCP server.
//!
//! Everything is read from the environment (after loading `.env`) once at
//! startup.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::backend::ClientConfig;
use crate::domains::{Service, select_services};

pub const DEFAULT_SERVER_NAME: &str = "mcp-digitalocean";
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// DigitalOcean API endpoint and credentials.
    pub api: ApiConfig,

    /// Service areas to expose.
    pub services: ServicesConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Backend API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the v2 REST API.
    pub url: String,

    /// Bearer token, already cleaned of surrounding whitespace and quotes.
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

/// Custom Debug implementation to redact the token from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Service selection, as given. Empty means every supported service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServicesConfig {
    pub names: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: DEFAULT_SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
            services: ServicesConfig::default(),
        }
    }
}

/// Strip surrounding whitespace, then surrounding single quotes.
/// Blank tokens count as unset.
fn clean_token(raw: &str) -> Option<String> {
    let token = raw.trim().trim_matches('\'');
    (!token.is_empty()).then(|| token.to_string())
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_SERVICES`,
    /// `DIGITALOCEAN_API_TOKEN`, `DIGITALOCEAN_API_URL` and the transport
    /// variables. Nothing is validated here; see [`Config::validate`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(services) = std::env::var("MCP_SERVICES") {
            config.services.names = services.split(',').map(|s| s.trim().to_string()).collect();
        }

        config.api.token = std::env::var("DIGITALOCEAN_API_TOKEN")
            .ok()
            .and_then(|raw| clean_token(&raw));

        if let Ok(url) = std::env::var("DIGITALOCEAN_API_URL") {
            info!("Using DigitalOcean API at {}", url);
            config.api.url = url;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }

    /// Check everything startup depends on.
    pub fn validate(&self) -> Result<()> {
        if self.api.token.is_none() {
            return Err(Error::config(
                "DigitalOcean API token not provided. Set DIGITALOCEAN_API_TOKEN",
            ));
        }
        self.selected_services()?;
        Ok(())
    }

    /// The service areas to expose.
    pub fn selected_services(&self) -> Result<Vec<Service>> {
        select_services(&self.services.names).map_err(|e| Error::config(e.to_string()))
    }

    /// Connection settings for the backend client.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let token = self
            .api
            .token
            .clone()
            .ok_or_else(|| Error::config("DigitalOcean API token not provided"))?;
        Ok(ClientConfig {
            api_url: self.api.url.clone(),
            token,
            user_agent: format!("{}/{}", DEFAULT_SERVER_NAME, self.server.version),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "DIGITALOCEAN_API_TOKEN",
        "DIGITALOCEAN_API_URL",
        "MCP_SERVICES",
        "MCP_SERVER_NAME",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_token_is_cleaned() {
        assert_eq!(clean_token("  'dop_v1_abc'\n").as_deref(), Some("dop_v1_abc"));
        assert_eq!(clean_token("dop_v1_abc").as_deref(), Some("dop_v1_abc"));
        assert_eq!(clean_token(" '' "), None);
    }

    #[test]
    fn test_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("DIGITALOCEAN_API_TOKEN", " 'secret-token' ");
            std::env::set_var("MCP_SERVICES", "droplets, accounts");
        }

        let config = Config::from_env();
        assert_eq!(config.api.token.as_deref(), Some("secret-token"));
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(
            config.selected_services().unwrap(),
            vec![Service::Droplets, Service::Accounts]
        );
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    fn test_validate_requires_token() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("DIGITALOCEAN_API_TOKEN")));
    }

    #[test]
    fn test_validate_rejects_unknown_service() {
        let mut config = Config::default();
        config.api.token = Some("t".to_string());
        config.services.names = vec!["apps".to_string()];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported service: apps"));
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let api = ApiConfig {
            url: DEFAULT_API_URL.to_string(),
            token: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", api);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_client_config_user_agent() {
        let mut config = Config::default();
        config.api.token = Some("t".to_string());
        let client = config.client_config().unwrap();
        assert_eq!(
            client.user_agent,
            format!("mcp-digitalocean/{}", env!("CARGO_PKG_VERSION"))
        );
    }
}
