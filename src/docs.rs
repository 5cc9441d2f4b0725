use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceSummary};
use crate::models::{AttendancePage, AttendancePayload, ErrorBody, PageQuery, Pagination};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Records one attendance entry per employee per calendar day and exposes it for
listing, searching, filtering by date, deletion and summary counts.

### Response Format
- Success: `{ "success": true, "data": ..., "message"?: ..., "pagination"?: {page, limit, total} }`
- Failure: `{ "success": false, "error": "..." }`
- `pagination.total` is the number of rows in the returned page

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::list_by_date,
        crate::api::attendance::list_by_employee,
        crate::api::attendance::search_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::summary,

        crate::api::health::health
    ),
    components(
        schemas(
            Attendance,
            AttendanceStatus,
            AttendanceSummary,
            AttendancePayload,
            AttendancePage,
            Pagination,
            PageQuery,
            ErrorBody
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance record APIs"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_attendance_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/attendance",
            "/api/attendance/date/{date}",
            "/api/attendance/search/{query}",
            "/api/attendance/{id}",
            "/api/attendance/stats/summary",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
