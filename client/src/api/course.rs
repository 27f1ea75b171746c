use shared::types::{Course, Envelope};

use super::decode;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

pub async fn list<T: Transport>(transport: &T) -> Result<Vec<Course>, ApiError> {
    let envelope = transport.send(ApiRequest::get("/course/list")).await?;
    decode(&envelope)
}

pub async fn get<T: Transport>(transport: &T, id: i64) -> Result<Course, ApiError> {
    let envelope = transport.send(ApiRequest::get(format!("/course/{}", id))).await?;
    decode(&envelope)
}

/// Upsert keyed on `id`; the course code must stay unique server-side.
pub async fn save<T: Transport>(transport: &T, course: &Course) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::post("/course/save").json(course)?)
        .await
}

pub async fn delete<T: Transport>(transport: &T, id: i64) -> Result<Envelope, ApiError> {
    transport
        .send(ApiRequest::delete(format!("/course/{}", id)))
        .await
}
