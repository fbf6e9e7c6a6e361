//! Server configuration loading from file and environment variables.

use mutuo_convai::ConvaiConfig;
use mutuo_llm::OpenAiConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Vector index settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Model API settings. The API key comes from `OPENAI_API_KEY`, never
    /// from the file.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// ConvAI agent settings. The API key comes from `ELEVENLABS_API_KEY`,
    /// never from the file.
    #[serde(default)]
    pub convai: ConvaiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Vector index configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the pre-built index. Its absence is fatal.
    #[serde(default = "default_index_dir")]
    pub dir: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "mutuo_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_index_dir() -> String {
    "vectordb".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: default_index_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required secret is missing from the environment.
    #[error("required environment variable {0} is not set")]
    MissingSecret(&'static str),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `MUTUO_HOST` overrides `server.host`
/// - `MUTUO_PORT` overrides `server.port`
/// - `MUTUO_INDEX_DIR` overrides `index.dir`
/// - `MUTUO_AGENT_ID` overrides `convai.agent_id`
/// - `MUTUO_LOG_LEVEL` overrides `logging.level`
/// - `MUTUO_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// Secrets are then read from `OPENAI_API_KEY` and `ELEVENLABS_API_KEY`;
/// either missing (or blank) is [`ConfigError::MissingSecret`] — a fatal
/// precondition, the server does not start without both.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if a required secret is absent.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("MUTUO_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("MUTUO_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(dir) = std::env::var("MUTUO_INDEX_DIR") {
        config.index.dir = dir;
    }
    if let Ok(agent_id) = std::env::var("MUTUO_AGENT_ID") {
        config.convai.agent_id = agent_id;
    }
    if let Ok(level) = std::env::var("MUTUO_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("MUTUO_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    // Secrets come from the environment only.
    config.openai.api_key = require_secret("OPENAI_API_KEY")?;
    config.convai.api_key = require_secret("ELEVENLABS_API_KEY")?;

    Ok(config)
}

fn require_secret(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret(name)),
    }
}
