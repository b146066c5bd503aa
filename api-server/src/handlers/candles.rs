// GET /candles - the composition root of the request pipeline
//
// Per request: validate against the route schema, check the response cache,
// and on a miss run the candle source through a Worker so a crash in the
// computation degrades to a 500 envelope instead of tearing down the
// request task. Only computed 200s are stored; validation failures are
// cheap to reproduce and error responses should not shadow a recovery.
use std::time::Instant;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use dexcandles_common::Worker;

use crate::cache::cache_key;
use crate::response::{api_response, render, wrap_in_fail_result, wrap_in_ok_result, ApiEnvelope};
use crate::schema;
use crate::state::AppState;

pub async fn get_candles(State(state): State<AppState>, uri: Uri) -> Response {
    let started = Instant::now();
    let path = uri.path().to_string();

    // Ordered pairs, exactly as the client sent them; the cache key depends
    // on this order
    let pairs: Vec<(String, String)> =
        url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
            .into_owned()
            .collect();

    let Some(spec) = schema::for_route(&path) else {
        // A route wired up without a schema entry is a bug, not user error
        error!("no parameter schema registered for {path}");
        return respond(
            &state,
            &path,
            started,
            StatusCode::INTERNAL_SERVER_ERROR,
            &wrap_in_fail_result(
                json!("missing parameter schema"),
                Some(StatusCode::INTERNAL_SERVER_ERROR),
            ),
        );
    };

    let params = match schema::validate(&pairs, spec) {
        Ok(params) => params,
        Err(field_errors) => {
            return respond(
                &state,
                &path,
                started,
                StatusCode::BAD_REQUEST,
                &wrap_in_fail_result(json!(field_errors), Some(StatusCode::BAD_REQUEST)),
            );
        }
    };

    let key = cache_key(&path, &pairs);
    if let Some(cached) = state.cache.get(&key).await {
        state.metrics.record_cache_hit(&path);
        state.metrics.record_http_request("GET", &path, cached.status);
        state
            .metrics
            .record_http_latency(&path, started.elapsed().as_secs_f64() * 1000.0);
        return cached.into_response();
    }
    state.metrics.record_cache_miss(&path);

    let (Some(token_a), Some(token_b), Some(interval)) = (
        params.text("tokenA").map(str::to_string),
        params.text("tokenB").map(str::to_string),
        params.integer("interval"),
    ) else {
        error!("validated parameters missing a required field for {path}");
        return respond(
            &state,
            &path,
            started,
            StatusCode::INTERNAL_SERVER_ERROR,
            &wrap_in_fail_result(
                json!("internal parameter error"),
                Some(StatusCode::INTERNAL_SERVER_ERROR),
            ),
        );
    };
    let limit = params.integer("limit").unwrap_or(100);
    let skip = params.integer("skip").unwrap_or(0);

    let source = state.candles.clone();
    let mut worker = Worker::spawn(async move {
        source
            .get_candles(&token_a, &token_b, interval, limit, skip)
            .await
    });

    match worker.join().await {
        Some(series) => {
            let rendered = render(&wrap_in_ok_result(json!(series)), StatusCode::OK);
            state.cache.set(&key, rendered.clone()).await;
            state.metrics.record_http_request("GET", &path, rendered.status);
            state
                .metrics
                .record_http_latency(&path, started.elapsed().as_secs_f64() * 1000.0);
            rendered.into_response()
        }
        None => {
            let message = worker
                .error()
                .unwrap_or("candle computation failed")
                .to_string();
            error!("candle computation failed: {message}");
            respond(
                &state,
                &path,
                started,
                StatusCode::INTERNAL_SERVER_ERROR,
                &wrap_in_fail_result(json!(message), Some(StatusCode::INTERNAL_SERVER_ERROR)),
            )
        }
    }
}

fn respond(
    state: &AppState,
    path: &str,
    started: Instant,
    status: StatusCode,
    envelope: &ApiEnvelope,
) -> Response {
    state.metrics.record_http_request("GET", path, status.as_u16());
    state
        .metrics
        .record_http_latency(path, started.elapsed().as_secs_f64() * 1000.0);
    api_response(envelope, status)
}
