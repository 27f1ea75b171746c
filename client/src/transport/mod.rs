//! Outbound HTTP and response normalization.
//!
//! Every call ends in exactly one of two outcomes: an [`Envelope`] or an
//! [`ApiError`] carrying a human-readable message.

mod http_transport;
mod normalize;

pub use self::http_transport::HttpTransport;
pub use self::normalize::{RawBody, classify_body, status_error};

use std::future::Future;

use http::Method;
use serde::Serialize;
use serde_json::Value;
use shared::types::Envelope;

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Request descriptor
// ---------------------------------------------------------------------------

/// What to call: method, path below the base URL, query and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("body not serializable: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Path with the form-urlencoded query appended.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Performs a request and normalizes whatever comes back.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Envelope, ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_without_query_is_unchanged() {
        let req = ApiRequest::get("/course/list");
        assert_eq!(req.path_and_query(), "/course/list");
    }

    #[test]
    fn query_pairs_are_encoded_in_order() {
        let req = ApiRequest::post("/student-course/select")
            .query("studentId", 7)
            .query("courseId", 12);
        assert_eq!(
            req.path_and_query(),
            "/student-course/select?studentId=7&courseId=12"
        );
    }

    #[test]
    fn query_values_are_escaped() {
        let req = ApiRequest::get("/search").query("q", "a b&c");
        assert_eq!(req.path_and_query(), "/search?q=a+b%26c");
    }

    #[test]
    fn json_body_is_captured() {
        let req = ApiRequest::post("/major/save")
            .json(&json!({"majorCode": "CS"}))
            .unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.body, Some(json!({"majorCode": "CS"})));
    }
}
