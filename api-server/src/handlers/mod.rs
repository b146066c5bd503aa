// HTTP handlers for the API server
pub mod candles;
pub mod health;
pub mod metrics;

use std::any::Any;

use axum::http::{StatusCode, Uri};
use axum::response::Response;
use serde_json::json;
use tracing::{debug, error};

use crate::response::{api_response, wrap_in_fail_result};

/// Fallback for unknown routes; still answers in the envelope format.
pub async fn not_found(uri: Uri) -> Response {
    debug!("unknown route requested: {}", uri.path());
    api_response(
        &wrap_in_fail_result(json!("invalid endpoint"), None),
        StatusCode::NOT_FOUND,
    )
}

/// Last-resort handler for a panic anywhere in the request pipeline; the
/// client still gets the standard envelope, never a bare error.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unhandled internal error".to_string()
    };

    error!("unhandled panic while processing endpoint request: {detail}");
    api_response(
        &wrap_in_fail_result(json!(detail), Some(StatusCode::INTERNAL_SERVER_ERROR)),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}
