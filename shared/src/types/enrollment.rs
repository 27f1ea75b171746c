use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::account::Student;
use super::course::Course;

/// One course selection made by a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_time: Option<String>,
}

/// Aggregate figures from `GET /enrollment/statistics`.
///
/// The backend decides which counters to report, so they stay untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentStatistics(pub Map<String, Value>);

impl EnrollmentStatistics {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}
