// Response caching: key derivation and pluggable backing stores
//
// The store is an injected capability rather than a global, so tests can
// swap in the in-memory or no-op variants. Store failures degrade to cache
// misses; a cache outage must never fail a request.
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use dexcandles_common::Result;

/// Canonical cache key for a request: base URL plus `name=value` pairs in
/// request order, values lowercased. No parameters means the bare base URL.
/// Parameter names are deliberately left unnormalized and unsorted.
pub fn cache_key(base_url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return base_url.to_string();
    }
    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{name}={}", value.to_lowercase()))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base_url}?{joined}")
}

/// A fully rendered response: exact body bytes, status and content type.
/// Replaying one of these is byte-identical to the original response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedResponse>;
    async fn set(&self, key: &str, entry: CachedResponse);
}

/// In-memory store with a fixed TTL and a bounded entry count. When the cap
/// is reached the oldest-inserted entry is evicted first.
pub struct MemoryStore {
    ttl: Duration,
    max_entries: usize,
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    entries: HashMap<String, (Instant, CachedResponse)>,
    order: VecDeque<String>,
}

impl MemoryStore {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<CachedResponse> {
        {
            let inner = self.inner.read().await;
            match inner.entries.get(key) {
                None => return None,
                Some((expiry, entry)) if *expiry > Instant::now() => return Some(entry.clone()),
                Some(_) => {}
            }
        }

        // Entry looked expired under the read lock; re-check and drop it
        let mut inner = self.inner.write().await;
        let expired = match inner.entries.get(key) {
            Some((expiry, entry)) => {
                if *expiry > Instant::now() {
                    return Some(entry.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
        }
        None
    }

    async fn set(&self, key: &str, entry: CachedResponse) {
        let expiry = Instant::now() + self.ttl;
        let mut inner = self.inner.write().await;

        if inner.entries.contains_key(key) {
            inner.entries.insert(key.to_string(), (expiry, entry));
            // A refreshed entry is the newest again, so it leaves the
            // front of the eviction queue
            inner.order.retain(|k| k != key);
            inner.order.push_back(key.to_string());
            return;
        }

        while inner.entries.len() >= self.max_entries {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }

        inner.order.push_back(key.to_string());
        inner.entries.insert(key.to_string(), (expiry, entry));
    }
}

/// Redis-backed store; TTL is enforced server-side via SETEX and growth is
/// bounded by Redis's own memory policy.
pub struct RedisStore {
    connection: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisStore {
    pub async fn new(redis_url: &str, ttl: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            connection,
            ttl_secs: ttl.as_secs().max(1),
        })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Option<CachedResponse> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = match conn.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("cache read failed for {key}: {e}");
                return None;
            }
        };
        raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("discarding undecodable cache entry for {key}: {e}");
                None
            }
        })
    }

    async fn set(&self, key: &str, entry: CachedResponse) {
        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to encode cache entry for {key}: {e}");
                return;
            }
        };
        let mut conn = self.connection.clone();
        let stored: redis::RedisResult<()> = redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(payload)
            .query_async(&mut conn)
            .await;
        if let Err(e) = stored {
            warn!("cache write failed for {key}: {e}");
        }
    }
}

/// Always-miss store; disables caching entirely.
pub struct NoopStore;

#[async_trait]
impl CacheStore for NoopStore {
    async fn get(&self, _key: &str) -> Option<CachedResponse> {
        None
    }

    async fn set(&self, _key: &str, _entry: CachedResponse) {}
}
