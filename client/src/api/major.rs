use shared::types::{Envelope, Major};

use super::decode;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub async fn list<T: Transport>(transport: &T) -> Result<Vec<Major>, ApiError> {
    let envelope = transport.send(ApiRequest::get("/major/list")).await?;
    decode(&envelope)
}

pub async fn get<T: Transport>(transport: &T, id: i64) -> Result<Major, ApiError> {
    let envelope = transport.send(ApiRequest::get(format!("/major/{}", id))).await?;
    decode(&envelope)
}

pub async fn save<T: Transport>(transport: &T, major: &Major) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::post("/major/save").json(major)?)
        .await
}

pub async fn delete<T: Transport>(transport: &T, id: i64) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::delete(format!("/major/{}", id)))
        .await
}
