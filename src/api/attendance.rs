use actix_web::{HttpResponse, web};
use tracing::debug;

use crate::error::{AttendanceError, AttendanceResult};
use crate::models::{ApiResponse, AttendancePage, AttendancePayload, PageQuery};
use crate::service::AttendanceService;
use crate::utils::pagination::PageRequest;

/// List attendance records, newest date first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of attendance records", body = AttendancePage),
        (status = 503, description = "Database unavailable", body = crate::models::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<AttendanceService>,
    query: web::Query<PageQuery>,
) -> AttendanceResult<HttpResponse> {
    let page = PageRequest::from_query(&query);
    let (data, pagination) = service.list_attendance(page).await?;
    Ok(HttpResponse::Ok().json(AttendancePage::new(data, pagination)))
}

/// Record attendance for one employee on one day
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendancePayload,
    responses(
        (status = 201, description = "Attendance recorded", body = Object, example = json!({
            "success": true,
            "message": "Attendance recorded successfully",
            "data": {
                "id": 1,
                "employeeName": "Jane Doe",
                "employeeID": "E100",
                "date": "2024-03-01",
                "status": "Present",
                "createdAt": "2024-03-01T08:00:00Z",
                "updatedAt": "2024-03-01T08:00:00Z"
            }
        })),
        (status = 400, description = "Invalid payload", body = crate::models::ErrorBody),
        (status = 409, description = "Already recorded for this employee and date", body = crate::models::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    service: web::Data<AttendanceService>,
    payload: web::Json<AttendancePayload>,
) -> AttendanceResult<HttpResponse> {
    let record = service.create_attendance(&payload).await?;
    Ok(HttpResponse::Created()
        .json(ApiResponse::data(record).with_message("Attendance recorded successfully")))
}

/// Records on a given date, sorted by employee name
#[utoipa::path(
    get,
    path = "/api/attendance/date/{date}",
    params(
        ("date" = String, Path, description = "Date in YYYY-MM-DD form"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Records on that date", body = AttendancePage)
    ),
    tag = "Attendance"
)]
pub async fn list_by_date(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AttendanceResult<HttpResponse> {
    let date = path.into_inner();
    let page = PageRequest::from_query(&query);
    let (data, pagination) = service.list_by_date(&date, page).await?;
    Ok(HttpResponse::Ok().json(AttendancePage::new(data, pagination)))
}

/// Records of a single employee, newest date first
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Records of that employee", body = AttendancePage)
    ),
    tag = "Attendance"
)]
pub async fn list_by_employee(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AttendanceResult<HttpResponse> {
    let employee_id = path.into_inner();
    let page = PageRequest::from_query(&query);
    let (data, pagination) = service.list_by_employee(&employee_id, page).await?;
    Ok(HttpResponse::Ok().json(AttendancePage::new(data, pagination)))
}

/// Case-insensitive substring search on employee name or ID
#[utoipa::path(
    get,
    path = "/api/attendance/search/{query}",
    params(
        ("query" = String, Path, description = "At least 2 characters"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Matching records", body = AttendancePage),
        (status = 400, description = "Query too short", body = crate::models::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn search_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AttendanceResult<HttpResponse> {
    let term = path.into_inner();
    let page = PageRequest::from_query(&query);
    debug!(term = %term, page = page.page(), limit = page.limit(), "Searching attendance");
    let (data, pagination) = service.search_attendance(&term, page).await?;
    Ok(HttpResponse::Ok().json(AttendancePage::new(data, pagination)))
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "success": true,
            "message": "Attendance record deleted successfully"
        })),
        (status = 400, description = "ID is not a number", body = crate::models::ErrorBody),
        (status = 404, description = "No such record", body = crate::models::ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
) -> AttendanceResult<HttpResponse> {
    let id = path
        .trim()
        .parse::<u64>()
        .map_err(|_| AttendanceError::Validation("Valid attendance ID is required".to_string()))?;

    service.delete_attendance(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Attendance record deleted successfully")))
}

/// Aggregate counts over all records
#[utoipa::path(
    get,
    path = "/api/attendance/stats/summary",
    responses(
        (status = 200, description = "Totals", body = Object, example = json!({
            "success": true,
            "data": {"total": 42, "present": 37, "absent": 5, "totalEmployees": 9}
        }))
    ),
    tag = "Attendance"
)]
pub async fn summary(service: web::Data<AttendanceService>) -> AttendanceResult<HttpResponse> {
    let summary = service.get_summary().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(summary)))
}
