use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Request, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use shared::types::{ApiConfig, Envelope};
use tracing::{debug, error, info, warn};

use super::normalize::{RawBody, classify_body, status_error};
use super::{ApiRequest, Transport};
use crate::error::ApiError;
use crate::storage::{DurableStorage, StorageWrite, TOKEN_KEY, USER_KEY};

/// hyper-backed [`Transport`].
///
/// Reads the bearer token from durable storage on every call, so a token
/// set or cleared anywhere is picked up by the next request.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    timeout: Duration,
    storage: Arc<dyn DurableStorage>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        storage: Arc<dyn DurableStorage>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("HTTP transport targeting {} (timeout {:?})", base_url, timeout);

        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url,
            timeout,
            storage,
        }
    }

    pub fn from_config(config: &ApiConfig, storage: Arc<dyn DurableStorage>) -> Self {
        Self::new(config.resolved_base_url(), config.timeout(), storage)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.storage
    }

    fn build_request(&self, request: &ApiRequest) -> Result<Request<Full<Bytes>>, ApiError> {
        let target = format!("{}{}", self.base_url, request.path_and_query());
        let uri: Uri = target
            .parse()
            .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", target, e)))?;

        let body = match &request.body {
            Some(value) => Bytes::from(
                serde_json::to_vec(value)
                    .map_err(|e| ApiError::InvalidRequest(format!("body not serializable: {}", e)))?,
            ),
            None => Bytes::new(),
        };

        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/plain, */*");

        if let Some(token) = self.storage.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        builder
            .body(Full::new(body))
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build request: {}", e)))
    }

    /// Send and read the full body, all under the configured timeout.
    async fn exchange(
        &self,
        request: Request<Full<Bytes>>,
    ) -> Result<(StatusCode, HeaderMap, Bytes), ApiError> {
        let round_trip = async {
            let response = self.client.request(request).await.map_err(|e| {
                if e.is_connect() {
                    warn!("Connection failed: {}", e);
                    ApiError::Network("network connection failed".to_string())
                } else {
                    warn!("Request failed without a response: {}", e);
                    ApiError::Network("network error".to_string())
                }
            })?;

            let (parts, body) = response.into_parts();
            let bytes = body
                .collect()
                .await
                .map_err(|e| {
                    warn!("Failed reading response body: {}", e);
                    ApiError::Network("network error".to_string())
                })?
                .to_bytes();

            Ok((parts.status, parts.headers, bytes))
        };

        match tokio::time::timeout(self.timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Request exceeded {:?}", self.timeout);
                Err(ApiError::Timeout)
            }
        }
    }

    /// Any endpoint answering 401 means the stored credentials are stale.
    fn invalidate_session(&self) {
        warn!("Server answered 401, clearing stored token and user");
        if let Err(e) = self
            .storage
            .apply(&[StorageWrite::remove(TOKEN_KEY), StorageWrite::remove(USER_KEY)])
        {
            error!("Failed to clear stored credentials: {}", e);
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Envelope, ApiError> {
        debug!("Sending request: {} {}", request.method, request.path_and_query());

        let http_request = self.build_request(&request)?;
        let (status, headers, bytes) = self.exchange(http_request).await.inspect_err(|e| {
            error!("{} {} failed: {}", request.method, request.path, e);
        })?;

        debug!(
            "Received {} for {} {} ({} bytes)",
            status.as_u16(),
            request.method,
            request.path,
            bytes.len()
        );

        let body = decode_body(status, &headers, bytes);

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.invalidate_session();
            }
            let err = status_error(status.as_u16(), &body);
            error!("{} {} failed: {}", request.method, request.path, err);
            return Err(err);
        }

        classify_body(body)
    }
}

/// Turn raw bytes into a [`RawBody`], parsing JSON when the server says so.
fn decode_body(status: StatusCode, headers: &HeaderMap, bytes: Bytes) -> RawBody {
    if status == StatusCode::NO_CONTENT {
        return RawBody::Missing;
    }

    if bytes.is_empty() {
        return RawBody::Empty;
    }

    let text = String::from_utf8_lossy(&bytes).into_owned();

    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if is_json {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => return RawBody::Json(value),
            Err(e) => debug!("JSON content type but body did not parse: {}", e),
        }
    }

    RawBody::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use http::HeaderValue;
    use serde_json::json;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json;charset=UTF-8"));
        headers
    }

    fn transport_with_token(token: Option<&str>) -> HttpTransport {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(t) = token {
            storage.set(TOKEN_KEY, t).unwrap();
        }
        HttpTransport::new("http://127.0.0.1:8080/", Duration::from_secs(1), storage)
    }

    #[test]
    fn json_content_type_is_parsed() {
        let body = decode_body(StatusCode::OK, &json_headers(), Bytes::from(r#"{"a":1}"#));
        assert_eq!(body, RawBody::Json(json!({"a": 1})));
    }

    #[test]
    fn json_content_type_with_bad_body_falls_back_to_text() {
        let body = decode_body(StatusCode::OK, &json_headers(), Bytes::from("{oops"));
        assert_eq!(body, RawBody::Text("{oops".into()));
    }

    #[test]
    fn other_content_types_are_text() {
        let body = decode_body(StatusCode::OK, &HeaderMap::new(), Bytes::from("42"));
        assert_eq!(body, RawBody::Text("42".into()));
    }

    #[test]
    fn zero_bytes_is_empty_and_204_is_missing() {
        assert_eq!(
            decode_body(StatusCode::OK, &HeaderMap::new(), Bytes::new()),
            RawBody::Empty
        );
        assert_eq!(
            decode_body(StatusCode::NO_CONTENT, &HeaderMap::new(), Bytes::new()),
            RawBody::Missing
        );
    }

    #[tokio::test]
    async fn bearer_header_attached_when_token_present() {
        let transport = transport_with_token(Some("abc123"));
        let req = transport.build_request(&ApiRequest::get("/user/info")).unwrap();
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc123");
        assert_eq!(req.uri(), "http://127.0.0.1:8080/user/info");
    }

    #[tokio::test]
    async fn no_bearer_header_without_token() {
        let transport = transport_with_token(None);
        let req = transport.build_request(&ApiRequest::get("/course/list")).unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn unparseable_uri_is_invalid_request() {
        let transport = transport_with_token(None);
        let result = transport.build_request(&ApiRequest::get("/bad path with spaces"));
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }
}
