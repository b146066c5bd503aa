// Environment-driven configuration for the API server
use crate::error::{CandlesError, Result};

pub const DEFAULT_GRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/pangolindex/dex-candles";

/// Which backing store the response cache uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub graph_url: String,
    pub graph_timeout_secs: u64,
    pub cache_backend: CacheBackend,
    pub redis_url: String,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
}

impl Config {
    /// Builds the config from environment variables, falling back to
    /// defaults for anything unset. Malformed numeric values are a
    /// config error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_host: env_or("API_HOST", "127.0.0.1"),
            api_port: parse_env("API_PORT", 43114)?,
            graph_url: env_or("GRAPH_URL", DEFAULT_GRAPH_URL),
            graph_timeout_secs: parse_env("GRAPH_TIMEOUT_SECS", 20)?,
            cache_backend: match env_or("CACHE_BACKEND", "memory").to_lowercase().as_str() {
                "memory" => CacheBackend::Memory,
                "redis" => CacheBackend::Redis,
                other => {
                    return Err(CandlesError::ConfigError(format!(
                        "unknown CACHE_BACKEND: {other}"
                    )))
                }
            },
            redis_url: env_or("REDIS_URL", "redis://localhost:6379"),
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", 300)?,
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 100_000)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: "127.0.0.1".to_string(),
            api_port: 43114,
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            graph_timeout_secs: 20,
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://localhost:6379".to_string(),
            cache_ttl_secs: 300,
            cache_max_entries: 100_000,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| CandlesError::ConfigError(format!("invalid {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}
