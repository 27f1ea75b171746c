use shared::types::{Account, Envelope};

use super::decode;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub async fn list<T: Transport>(transport: &T) -> Result<Vec<Account>, ApiError> {
    let envelope = transport.send(ApiRequest::get("/account/list")).await?;
    decode(&envelope)
}

pub async fn get<T: Transport>(transport: &T, id: i64) -> Result<Account, ApiError> {
    let envelope = transport.send(ApiRequest::get(format!("/account/{}", id))).await?;
    decode(&envelope)
}

/// Creates the account when `id` is unset, updates it otherwise.
pub async fn save<T: Transport>(transport: &T, account: &Account) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::post("/account/save").json(account)?)
        .await
}

pub async fn delete<T: Transport>(transport: &T, id: i64) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::delete(format!("/account/{}", id)))
        .await
}
