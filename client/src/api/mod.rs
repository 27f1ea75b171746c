//! Endpoint builders for the backend's REST surface.
//!
//! Each function names one endpoint: it builds the [`ApiRequest`] and hands
//! it to whatever [`Transport`] the caller supplies. No state lives here.
//!
//! [`ApiRequest`]: crate::transport::ApiRequest
//! [`Transport`]: crate::transport::Transport

pub mod account;
pub mod auth;
pub mod course;
pub mod enrollment;
pub mod major;

use serde::de::DeserializeOwned;
use shared::types::Envelope;

use crate::error::ApiError;

/// Decode an envelope's `data` into `T`, treating a mismatch as a malformed
/// response.
pub fn decode<T: DeserializeOwned>(envelope: &Envelope) -> Result<T, ApiError> {
    envelope
        .decode_data()
        .map_err(|e| ApiError::MalformedResponse(format!("unexpected data: {}", e)))
}
