use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_port: default_api_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_admin_token")]
    pub admin_token: String,
    /// Session lifetime in days
    #[serde(default = "default_session_days")]
    pub session_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
            admin_token: default_admin_token(),
            session_days: default_session_days(),
        }
    }
}

fn default_admin_email() -> String {
    "admin@gradxp.local".to_string()
}

fn default_admin_password() -> String {
    "ChangeMe-Gradxp-1!".to_string()
}

fn default_admin_token() -> String {
    // Generate a random token if not provided
    uuid::Uuid::new_v4().to_string()
}

fn default_session_days() -> i64 {
    7
}

/// What to do when a real chain call fails mid-flight.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Fall back to the simulated path and report success (demo behavior)
    Simulate,
    /// Propagate the error to the caller
    Surface,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of a real provider. When unset, the chain layer
    /// runs fully simulated.
    pub provider_url: Option<String>,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_fallback_policy")]
    pub on_error: FallbackPolicy,
    /// Simulated wallet-connect latency in milliseconds
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,
    /// Simulated contract-call latency in milliseconds
    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            chain_id: default_chain_id(),
            on_error: default_fallback_policy(),
            connect_delay_ms: default_connect_delay_ms(),
            call_delay_ms: default_call_delay_ms(),
        }
    }
}

fn default_chain_id() -> u64 {
    1
}

fn default_fallback_policy() -> FallbackPolicy {
    FallbackPolicy::Simulate
}

fn default_connect_delay_ms() -> u64 {
    800
}

fn default_call_delay_ms() -> u64 {
    1500
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            chain: ChainConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
