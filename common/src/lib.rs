// Common types and utilities shared across the dexcandles services
pub mod types;
pub mod error;
pub mod config;
pub mod metrics;
pub mod graph;
pub mod worker;

pub use types::*;
pub use error::*;
pub use config::{CacheBackend, Config};
pub use graph::Graph;
pub use metrics::MetricsCollector;
pub use worker::Worker;
