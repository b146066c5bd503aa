// Candle computation capability
//
// The handler only knows the `CandleSource` trait; the production
// implementation reads pre-aggregated candles from the dex-candles subgraph
// through the resilient Graph client.
use async_trait::async_trait;
use serde_json::{json, Value};

use dexcandles_common::{Candle, CandlesError, Graph, MetricsCollector, Result};

#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn get_candles(
        &self,
        token_a: &str,
        token_b: &str,
        interval: i64,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Candle>>;
}

const CANDLES_QUERY: &str = r#"
query ($token0: String!, $token1: String!, $period: Int!, $first: Int!, $skip: Int!) {
  candles(
    first: $first
    skip: $skip
    orderBy: time
    orderDirection: desc
    where: { token0: $token0, token1: $token1, period: $period }
  ) {
    time
    open
    high
    low
    close
  }
}
"#;

pub struct SubgraphCandles {
    graph: Graph,
    metrics: MetricsCollector,
}

impl SubgraphCandles {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            metrics: MetricsCollector::new(),
        }
    }
}

#[async_trait]
impl CandleSource for SubgraphCandles {
    async fn get_candles(
        &self,
        token_a: &str,
        token_b: &str,
        interval: i64,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Candle>> {
        // The subgraph stores each pair once, with token0 < token1
        let (token0, token1) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        let variables = json!({
            "token0": token0,
            "token1": token1,
            "period": interval,
            "first": limit,
            "skip": skip,
        });

        let data = self
            .graph
            .query(CANDLES_QUERY, Some(&variables))
            .await
            .ok_or_else(|| {
                self.metrics.record_graph_failure();
                CandlesError::Upstream(format!(
                    "candle query for {token0}/{token1} returned no result"
                ))
            })?;

        let rows = data.get("candles").and_then(Value::as_array).ok_or_else(|| {
            CandlesError::ParseError("candles field missing from graph response".to_string())
        })?;

        rows.iter().map(parse_candle).collect()
    }
}

fn parse_candle(row: &Value) -> Result<Candle> {
    Ok(Candle {
        time: integer_field(row, "time")?,
        open: decimal_field(row, "open")?,
        high: decimal_field(row, "high")?,
        low: decimal_field(row, "low")?,
        close: decimal_field(row, "close")?,
    })
}

fn integer_field(row: &Value, name: &str) -> Result<i64> {
    match row.get(name) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| CandlesError::ParseError(format!("{name} is not an integer: {n}"))),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| CandlesError::ParseError(format!("{name} is not an integer: {s}"))),
        other => Err(CandlesError::ParseError(format!(
            "{name} has unexpected value: {other:?}"
        ))),
    }
}

// Subgraph BigDecimal fields arrive as JSON strings
fn decimal_field(row: &Value, name: &str) -> Result<f64> {
    match row.get(name) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CandlesError::ParseError(format!("{name} is not a number: {n}"))),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| CandlesError::ParseError(format!("{name} is not a number: {s}"))),
        other => Err(CandlesError::ParseError(format!(
            "{name} has unexpected value: {other:?}"
        ))),
    }
}
