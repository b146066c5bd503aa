// Resilient client for The Graph's HTTP endpoint
//
// The one contract that matters here: `query` never fails loudly. Transport
// errors, HTTP errors, GraphQL protocol errors and timeouts all collapse to
// `None` with a warn-level diagnostic, so callers treat "upstream broke" and
// "upstream had nothing" identically.
use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::Result;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub struct Graph {
    url: String,
    client: reqwest::Client,
}

impl Graph {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Executes a GraphQL query with optional variables. Returns the `data`
    /// object on success, `None` on any failure.
    pub async fn query(&self, query: &str, variables: Option<&Value>) -> Option<Map<String, Value>> {
        debug!(url = %self.url, "querying graph api: {query}");
        if let Some(vars) = variables {
            debug!("variables: {vars}");
        }

        let body = json!({
            "query": query,
            "variables": variables.cloned().unwrap_or(Value::Null),
        });

        let response = match self.client.post(&self.url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                self.log_failure(query, variables, &e.to_string());
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                self.log_failure(query, variables, &e.to_string());
                return None;
            }
        };

        let payload: Value = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                self.log_failure(query, variables, &e.to_string());
                return None;
            }
        };

        // GraphQL reports application-level failures in-band
        if let Some(errors) = payload.get("errors") {
            if !errors.is_null() {
                self.log_failure(query, variables, &errors.to_string());
                return None;
            }
        }

        match payload.get("data").and_then(Value::as_object) {
            Some(data) => Some(data.clone()),
            None => {
                self.log_failure(query, variables, "response has no data object");
                None
            }
        }
    }

    fn log_failure(&self, query: &str, variables: Option<&Value>, detail: &str) {
        warn!(
            url = %self.url,
            "error fetching graph api: {detail}; query: {query}; variables: {}",
            variables.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // One-shot HTTP server that answers every request with `body`
    async fn serve_once(body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_query_returns_data_on_success() {
        let url = serve_once(r#"{"data":{"candles":[{"time":300}]}}"#.to_string()).await;
        let graph = Graph::new(url).unwrap();

        let data = graph.query("{ candles { time } }", None).await.unwrap();
        assert_eq!(data["candles"][0]["time"], 300);
    }

    #[tokio::test]
    async fn test_query_absent_on_graphql_errors() {
        let url = serve_once(r#"{"errors":[{"message":"bad query"}]}"#.to_string()).await;
        let graph = Graph::new(url).unwrap();

        assert!(graph.query("{ nope }", None).await.is_none());
    }

    #[tokio::test]
    async fn test_query_absent_on_missing_data() {
        let url = serve_once(r#"{"unexpected":true}"#.to_string()).await;
        let graph = Graph::new(url).unwrap();

        assert!(graph.query("{ candles { time } }", None).await.is_none());
    }

    #[tokio::test]
    async fn test_failure_diagnostics_accept_variables() {
        // The failure log renders the variables; make sure that path runs
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let graph = Graph::new(format!("http://{addr}")).unwrap();
        let vars = json!({"token0": "0xaaaa", "period": 300});
        assert!(graph.query("{ candles { time } }", Some(&vars)).await.is_none());
    }

    #[tokio::test]
    async fn test_query_absent_on_unreachable_endpoint() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let graph = Graph::new(format!("http://{addr}")).unwrap();
        assert!(graph.query("{ candles { time } }", None).await.is_none());
    }

    #[tokio::test]
    async fn test_query_absent_on_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold the connection open without responding
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let graph =
            Graph::with_timeout(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        assert!(graph.query("{ candles { time } }", None).await.is_none());
    }
}
