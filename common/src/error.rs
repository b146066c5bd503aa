// Error types for the dexcandles services
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CandlesError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Upstream data unavailable: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, CandlesError>;
