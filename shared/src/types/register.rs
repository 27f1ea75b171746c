use serde::{Deserialize, Serialize};

/// Body of `POST /user/student/register`.
///
/// The backend creates the student record and its account in one step;
/// `enrollment_date` travels as an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<String>,
    pub major_id: i64,
}
