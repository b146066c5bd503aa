// The uniform response envelope and its rendering
//
// Every response this service produces, success or failure, is the same
// shape: {"result": <value-or-null>, "message": <string-or-map>,
// "status_code"?: <int>}. The rendered form (exact bytes + status +
// content type) is also what the cache stores, so replays are verbatim.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CachedResponse;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub result: Value,
    pub message: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Wraps a successful result; `message` is always empty.
pub fn wrap_in_ok_result(result: Value) -> ApiEnvelope {
    ApiEnvelope {
        result,
        message: Value::String(String::new()),
        status_code: None,
    }
}

/// Wraps a failure. `message` is a scalar description or a field->error map.
pub fn wrap_in_fail_result(message: Value, status_code: Option<StatusCode>) -> ApiEnvelope {
    ApiEnvelope {
        result: Value::Null,
        message,
        status_code: status_code.map(|s| s.as_u16()),
    }
}

/// Serializes the envelope to its wire form. A 204 must carry an empty
/// envelope; anything else there is a programming error.
pub fn render(envelope: &ApiEnvelope, status: StatusCode) -> CachedResponse {
    let body = if status == StatusCode::NO_CONTENT {
        debug_assert!(
            envelope.result.is_null() && envelope.message.as_str() == Some(""),
            "provided 204 response with non-empty envelope"
        );
        String::new()
    } else {
        serde_json::to_string(envelope).unwrap_or_else(|_| {
            r#"{"result":null,"message":"failed to serialize response"}"#.to_string()
        })
    };

    CachedResponse {
        status: status.as_u16(),
        content_type: CONTENT_TYPE_JSON.to_string(),
        body,
    }
}

pub fn api_response(envelope: &ApiEnvelope, status: StatusCode) -> Response {
    render(envelope, status).into_response()
}
