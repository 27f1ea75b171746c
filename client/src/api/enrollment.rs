use serde_json::Value;
use shared::types::{Envelope, Enrollment, EnrollmentStatistics};

use super::decode;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Transport};

// ---------------------------------------------------------------------------
// Course selection (student side)
// ---------------------------------------------------------------------------

pub async fn selected_courses<T: Transport>(
    transport: &T,
    student_id: i64,
) -> Result<Vec<Enrollment>, ApiError> {
    let envelope = transport
        .send(ApiRequest::get(format!("/student-course/selected/{}", student_id)))
        .await?;
    decode(&envelope)
}

pub async fn select_course<T: Transport>(
    transport: &T,
    student_id: i64,
    course_id: i64,
) -> Result<Envelope, ApiError> {
    transport
        .send(
            ApiRequest::post("/student-course/select")
                .query("studentId", student_id)
                .query("courseId", course_id),
        )
        .await
}

pub async fn drop_course<T: Transport>(
    transport: &T,
    student_id: i64,
    course_id: i64,
) -> Result<Envelope, ApiError> {
    transport
        .send(
            ApiRequest::delete("/student-course/drop")
                .query("studentId", student_id)
                .query("courseId", course_id),
        )
        .await
}

/// Sum of credits across the student's selected courses.
pub async fn total_credits<T: Transport>(transport: &T, student_id: i64) -> Result<f64, ApiError> {
    let envelope = transport
        .send(ApiRequest::get(format!("/student-course/credits/{}", student_id)))
        .await?;

    // Plain-text endpoints come back as a string payload.
    match &envelope.data {
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ApiError::MalformedResponse(format!("credits not numeric: {}", s))),
        _ => decode(&envelope),
    }
}

// ---------------------------------------------------------------------------
// Enrollment queries (admin side)
// ---------------------------------------------------------------------------

pub async fn all<T: Transport>(transport: &T) -> Result<Vec<Enrollment>, ApiError> {
    let envelope = transport.send(ApiRequest::get("/enrollment/all")).await?;
    decode(&envelope)
}

pub async fn by_student<T: Transport>(
    transport: &T,
    student_id: i64,
) -> Result<Vec<Enrollment>, ApiError> {
    let envelope = transport
        .send(ApiRequest::get(format!("/enrollment/student/{}", student_id)))
        .await?;
    decode(&envelope)
}

pub async fn by_course<T: Transport>(
    transport: &T,
    course_id: i64,
) -> Result<Vec<Enrollment>, ApiError> {
    let envelope = transport
        .send(ApiRequest::get(format!("/enrollment/course/{}", course_id)))
        .await?;
    decode(&envelope)
}

pub async fn statistics<T: Transport>(transport: &T) -> Result<EnrollmentStatistics, ApiError> {
    let envelope = transport.send(ApiRequest::get("/enrollment/statistics")).await?;
    decode(&envelope)
}
