use serde_json::{Map, Value};
use shared::types::Envelope;
use tracing::{debug, warn};

use crate::error::ApiError;

const REJECTED_FALLBACK: &str = "request failed";

// ---------------------------------------------------------------------------
// Body shapes
// ---------------------------------------------------------------------------

/// A response body as it came off the wire, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// The response carried no body at all.
    Missing,
    /// A body of zero bytes.
    Empty,
    Text(String),
    Json(Value),
}

/// Reduce a successful (2xx) response body to an envelope or a failure.
///
/// Text that looks like JSON is parsed; text that fails to parse, or never
/// looked like JSON, passes through as `data`. Objects with a `code` succeed
/// only when it equals 200. Objects and arrays without a `code` are wrapped
/// as `data`. Anything else is malformed.
pub fn classify_body(body: RawBody) -> Result<Envelope, ApiError> {
    match body {
        RawBody::Missing => Err(ApiError::MalformedResponse("missing body".to_string())),
        RawBody::Empty => Err(ApiError::MalformedResponse("empty".to_string())),
        RawBody::Text(text) => classify_text(&text),
        RawBody::Json(value) => classify_value(value),
    }
}

fn classify_text(text: &str) -> Result<Envelope, ApiError> {
    let trimmed = text.trim();

    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        debug!("Response is plain text, passing it through as data");
        return Ok(Envelope::ok(Value::String(trimmed.to_string())));
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => classify_value(value),
        Err(e) => {
            warn!("Response looked like JSON but did not parse ({}), passing text through", e);
            Ok(Envelope::ok(Value::String(trimmed.to_string())))
        }
    }
}

fn classify_value(value: Value) -> Result<Envelope, ApiError> {
    match value {
        Value::Object(object) => classify_object(object),
        Value::Array(_) => Ok(Envelope::ok(value)),
        // A JSON string literal is still text.
        Value::String(text) => classify_text(&text),
        other => Err(ApiError::MalformedResponse(shape_name(&other).to_string())),
    }
}

fn classify_object(object: Map<String, Value>) -> Result<Envelope, ApiError> {
    let Some(code) = object.get("code") else {
        debug!("Response has no code field, wrapping it as data");
        return Ok(Envelope::ok(Value::Object(object)));
    };

    if is_success_code(code) {
        return Ok(Envelope::from_object(object));
    }

    let code = code.clone();
    let message = non_empty_message(&object).unwrap_or_else(|| REJECTED_FALLBACK.to_string());
    warn!("Request rejected by server, code: {}, message: {}", code, message);
    Err(ApiError::RequestRejected { code, message })
}

/// Numeric equality with 200; `"200"`, `0` and `null` are all failures.
fn is_success_code(code: &Value) -> bool {
    code.as_f64() == Some(200.0)
}

fn non_empty_message(object: &Map<String, Value>) -> Option<String> {
    object
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Status failures
// ---------------------------------------------------------------------------

/// Map a non-2xx status to its failure. Only 400 consults the body.
pub fn status_error(status: u16, body: &RawBody) -> ApiError {
    let message = match status {
        400 => body_message(body).unwrap_or_else(|| "invalid parameters".to_string()),
        401 => "unauthorized".to_string(),
        403 => "forbidden".to_string(),
        404 => "resource not found".to_string(),
        500 => "internal server error".to_string(),
        other => format!("request failed with status {}", other),
    };
    ApiError::Http { status, message }
}

fn body_message(body: &RawBody) -> Option<String> {
    match body {
        RawBody::Json(Value::Object(object)) => non_empty_message(object),
        RawBody::Text(text) => match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Object(object)) => non_empty_message(&object),
            _ => None,
        },
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
