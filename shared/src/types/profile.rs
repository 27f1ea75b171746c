use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in account as returned by the backend.
///
/// Treated as an opaque bag of fields. Only `firstLogin` has meaning on the
/// client side; `username` gets a typed accessor because the session
/// mirrors it into its own storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub Map<String, Value>);

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts a JSON object; anything else is not a profile.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }

    pub fn first_login(&self) -> Option<bool> {
        self.0.get("firstLogin").and_then(Value::as_bool)
    }

    pub fn set_first_login(&mut self, first_login: bool) {
        self.0
            .insert("firstLogin".to_string(), Value::Bool(first_login));
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Shallow merge; fields from `partial` replace existing ones.
    pub fn merge(&mut self, partial: Map<String, Value>) {
        for (key, value) in partial {
            self.0.insert(key, value);
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
