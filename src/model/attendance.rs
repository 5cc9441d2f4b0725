use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Daily status of an employee. Parsing is case-sensitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "employeeName": "Jane Doe",
        "employeeID": "E100",
        "date": "2024-03-01",
        "status": "Present",
        "createdAt": "2024-03-01T08:00:00Z",
        "updatedAt": "2024-03-01T08:00:00Z"
    })
)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    #[serde(rename = "employeeID")]
    #[schema(example = "E100")]
    pub employee_id: String,

    /// Literal `YYYY-MM-DD`, no timezone attached.
    #[schema(example = "2024-03-01", format = "date")]
    pub date: String,

    pub status: AttendanceStatus,

    #[schema(example = "2024-03-01T08:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-03-01T08:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

/// A validated, trimmed record ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee_name: String,
    pub employee_id: String,
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "total": 42,
    "present": 37,
    "absent": 5,
    "totalEmployees": 9
}))]
pub struct AttendanceSummary {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub total_employees: i64,
}
