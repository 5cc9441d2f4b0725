use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::Attendance;

/// Incoming create payload. Every field is optional here so that a missing
/// field is reported by validation rather than by the JSON extractor.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePayload {
    #[schema(example = "Jane Doe")]
    pub employee_name: Option<String>,

    #[serde(rename = "employeeID")]
    #[schema(example = "E100")]
    pub employee_id: Option<String>,

    #[schema(example = "2024-03-01", format = "date")]
    pub date: Option<String>,

    #[schema(example = "Present")]
    pub status: Option<String>,
}

/// `page` and `limit` arrive as raw strings; unparsable or non-positive values
/// fall back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[schema(example = "1")]
    /// Page number, starting at 1
    pub page: Option<String>,
    #[schema(example = "50")]
    /// Rows per page
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 50)]
    pub limit: u64,
    /// Number of rows in this page.
    #[schema(example = 1)]
    pub total: u64,
}

/// Success envelope for non-list responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "data": [{
        "id": 1,
        "employeeName": "Jane Doe",
        "employeeID": "E100",
        "date": "2024-03-01",
        "status": "Present",
        "createdAt": "2024-03-01T08:00:00Z",
        "updatedAt": "2024-03-01T08:00:00Z"
    }],
    "pagination": {"page": 1, "limit": 50, "total": 1}
}))]
pub struct AttendancePage {
    pub success: bool,
    pub data: Vec<Attendance>,
    pub pagination: Pagination,
}

impl AttendancePage {
    pub fn new(data: Vec<Attendance>, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "success": false,
    "error": "Attendance already recorded for this employee on the specified date"
}))]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
