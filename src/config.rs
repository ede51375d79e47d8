use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Spotlight bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Domain identifier applied to items submitted without one.
    pub default_domain: String,
    /// Base URL of a remote index service. When absent the in-process index is used.
    pub index_url: Option<String>,
    /// Optional API key sent to the remote index service.
    pub index_api_key: Option<String>,
    /// Timeout applied to each remote index request, in seconds.
    pub index_timeout_secs: u64,
    /// Capability probe result reported by the host.
    pub indexing_supported: bool,
    /// Upper bound on chunks registered at the same time.
    pub max_concurrent_chunks: usize,
    /// Timeout applied to each thumbnail request, in seconds.
    pub thumbnail_timeout_secs: u64,
    /// Optional bound on thumbnail width and height, in pixels.
    pub thumbnail_max_dimension: Option<u32>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

const DEFAULT_MAX_CONCURRENT_CHUNKS: usize = 4;
const DEFAULT_THUMBNAIL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_INDEX_TIMEOUT_SECS: u64 = 30;

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            default_domain: load_env_optional("SPOTLIGHT_DEFAULT_DOMAIN")
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            index_url: load_env_optional("SPOTLIGHT_INDEX_URL"),
            index_api_key: load_env_optional("SPOTLIGHT_INDEX_API_KEY"),
            index_timeout_secs: load_positive("SPOTLIGHT_INDEX_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_INDEX_TIMEOUT_SECS),
            indexing_supported: load_env_optional("SPOTLIGHT_SUPPORTED")
                .map(|value| parse_bool(&value, "SPOTLIGHT_SUPPORTED"))
                .transpose()?
                .unwrap_or(true),
            max_concurrent_chunks: load_positive("SPOTLIGHT_MAX_CONCURRENT_CHUNKS")?
                .unwrap_or(DEFAULT_MAX_CONCURRENT_CHUNKS),
            thumbnail_timeout_secs: load_positive("SPOTLIGHT_THUMBNAIL_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_THUMBNAIL_TIMEOUT_SECS),
            thumbnail_max_dimension: load_positive("SPOTLIGHT_THUMBNAIL_MAX_DIMENSION")?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_domain: env!("CARGO_PKG_NAME").to_string(),
            index_url: None,
            index_api_key: None,
            index_timeout_secs: DEFAULT_INDEX_TIMEOUT_SECS,
            indexing_supported: true,
            max_concurrent_chunks: DEFAULT_MAX_CONCURRENT_CHUNKS,
            thumbnail_timeout_secs: DEFAULT_THUMBNAIL_TIMEOUT_SECS,
            thumbnail_max_dimension: None,
            server_port: None,
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_positive<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    load_env_optional(key)
        .map(|value| match value.trim().parse::<T>() {
            Ok(parsed) if parsed > T::default() => Ok(parsed),
            _ => Err(ConfigError::InvalidValue(key.to_string())),
        })
        .transpose()
}

fn parse_bool(value: &str, key: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        default_domain = %config.default_domain,
        index_url = ?config.index_url,
        supported = config.indexing_supported,
        max_concurrent_chunks = config.max_concurrent_chunks,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("TRUE", "KEY").unwrap());
        assert!(parse_bool(" yes ", "KEY").unwrap());
        assert!(!parse_bool("0", "KEY").unwrap());
        assert!(!parse_bool("off", "KEY").unwrap());
        assert!(matches!(
            parse_bool("maybe", "KEY"),
            Err(ConfigError::InvalidValue(key)) if key == "KEY"
        ));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.default_domain, "spotlight-bridge");
        assert_eq!(config.max_concurrent_chunks, 4);
        assert_eq!(config.thumbnail_timeout_secs, 10);
        assert_eq!(config.index_timeout_secs, 30);
        assert!(config.indexing_supported);
        assert!(config.index_url.is_none());
    }
}
