use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The `code` value the backend uses for a successful call.
pub const SUCCESS_CODE: i64 = 200;

/// Message attached to envelopes the client synthesizes itself.
pub const OK_MESSAGE: &str = "ok";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Normalized `{ code, message, data }` response.
///
/// Envelopes returned by the server are kept as-is: any top-level fields
/// besides `code`, `message` and `data` land in `extra` so the object can be
/// reproduced unchanged with [`Envelope::to_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub code: i64,
    pub message: String,
    pub data: Value,
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Wrap a payload that arrived without an envelope of its own.
    pub fn ok(data: Value) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: OK_MESSAGE.to_string(),
            data,
            extra: Map::new(),
        }
    }

    /// Split a server object carrying `code == 200` into envelope fields.
    ///
    /// The caller has already checked the code; `message` falls back to an
    /// empty string when absent or not a string.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        object.remove("code");
        let message = match object.remove("message") {
            Some(Value::String(s)) => s,
            Some(other) => {
                // Keep non-string messages around rather than dropping them.
                object.insert("message".to_string(), other);
                String::new()
            }
            None => String::new(),
        };
        let data = object.remove("data").unwrap_or(Value::Null);

        Self {
            code: SUCCESS_CODE,
            message,
            data,
            extra: object,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Rebuild the JSON object this envelope represents.
    pub fn to_value(&self) -> Value {
        let mut object = self.extra.clone();
        object.insert("code".to_string(), Value::from(self.code));
        object
            .entry("message".to_string())
            .or_insert_with(|| Value::String(self.message.clone()));
        object.insert("data".to_string(), self.data.clone());
        Value::Object(object)
    }

    /// Decode `data` into a typed DTO.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
