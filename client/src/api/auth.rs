use shared::types::{ChangePasswordRequest, Envelope, LoginRequest, Major, RegisterRequest};

use super::decode;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub const LOGIN_PATH: &str = "/user/login";
pub const REGISTER_PATH: &str = "/user/student/register";
pub const LOGOUT_PATH: &str = "/user/logout";
pub const PROFILE_PATH: &str = "/user/info";
pub const CHANGE_PASSWORD_PATH: &str = "/user/change-password";
pub const PUBLIC_MAJORS_PATH: &str = "/user/major/list";

pub async fn login<T: Transport>(
    transport: &T,
    credentials: &LoginRequest,
) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::post(LOGIN_PATH).json(credentials)?)
        .await
}

pub async fn register<T: Transport>(
    transport: &T,
    details: &RegisterRequest,
) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::post(REGISTER_PATH).json(details)?)
        .await
}

pub async fn logout<T: Transport>(transport: &T) -> Result<Envelope, ApiError> {
    transport.send(ApiRequest::post(LOGOUT_PATH)).await
}

pub async fn profile<T: Transport>(transport: &T) -> Result<Envelope, ApiError> {
    transport.send(ApiRequest::get(PROFILE_PATH)).await
}

pub async fn change_password<T: Transport>(
    transport: &T,
    data: &ChangePasswordRequest,
) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::post(CHANGE_PASSWORD_PATH).json(data)?)
        .await
}

/// Majors offered at registration time; reachable without a session.
pub async fn public_majors<T: Transport>(transport: &T) -> Result<Vec<Major>, ApiError> {
    let envelope = transport.send(ApiRequest::get(PUBLIC_MAJORS_PATH)).await?;
    decode(&envelope)
}
