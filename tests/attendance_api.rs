// HTTP round trips through the real routing table, backed by the in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use attendance_tracker::config::Config;
use attendance_tracker::error::route_not_found;
use attendance_tracker::model::attendance::{Attendance, AttendanceSummary, NewAttendance};
use attendance_tracker::routes;
use attendance_tracker::service::AttendanceService;
use attendance_tracker::store::{AttendanceStore, InMemoryStore, StoreError};

macro_rules! test_app {
    ($store:expr) => {
        test_app!($store, Config::default())
    };
    ($store:expr, $config:expr) => {{
        let config: Config = $config;
        let service = AttendanceService::new($store);
        test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .app_data(web::Data::new(service))
                .configure(|cfg| routes::configure(cfg, &config))
                .default_service(web::to(route_not_found)),
        )
        .await
    }};
}

fn jane() -> Value {
    json!({
        "employeeName": "Jane Doe",
        "employeeID": "E100",
        "date": "2024-03-01",
        "status": "Present"
    })
}

#[actix_web::test]
async fn create_list_delete_round_trip() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(jane())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Attendance recorded successfully");
    assert_eq!(body["data"]["employeeName"], "Jane Doe");
    assert_eq!(body["data"]["employeeID"], "E100");
    let id = body["data"]["id"].as_u64().expect("generated id");

    // same employee and day again
    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(jane())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Attendance already recorded for this employee on the specified date"
    );

    let req = test::TestRequest::get()
        .uri("/api/attendance/date/2024-03-01")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], id);
    assert_eq!(body["pagination"], json!({"page": 1, "limit": 50, "total": 1}));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/attendance/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Attendance record deleted successfully");

    let req = test::TestRequest::get().uri("/api/attendance").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([]));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/attendance/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_payload_is_rejected_with_message() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({
            "employeeName": "Jane Doe",
            "employeeID": "E100",
            "date": "2024-1-5",
            "status": "Present"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Date must be in YYYY-MM-DD format");

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({"employeeName": "Jane Doe"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "All fields are required: employeeName, employeeID, date, status"
    );
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[actix_web::test]
async fn search_enforces_minimum_length() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({
            "employeeName": "Alan Turing",
            "employeeID": "E1",
            "date": "2024-03-01",
            "status": "Absent"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/attendance/search/a").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Search query must be at least 2 characters long");

    let req = test::TestRequest::get().uri("/api/attendance/search/AL").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["employeeName"], "Alan Turing");
}

#[actix_web::test]
async fn list_pagination_reports_page_size() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    for (id, date) in [("E1", "2024-03-01"), ("E2", "2024-03-02"), ("E3", "2024-03-03")] {
        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(json!({
                "employeeName": "Some Body",
                "employeeID": id,
                "date": date,
                "status": "Present"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/attendance?page=2&limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"], json!({"page": 2, "limit": 2, "total": 1}));
    assert_eq!(body["data"][0]["employeeID"], "E1");

    // garbage falls back to defaults
    let req = test::TestRequest::get()
        .uri("/api/attendance?page=zero&limit=-5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"], json!({"page": 1, "limit": 50, "total": 3}));
    assert_eq!(body["data"][0]["employeeID"], "E3");

    let req = test::TestRequest::get()
        .uri("/api/attendance/employee/E2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn delete_with_non_numeric_id_is_bad_request() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::delete().uri("/api/attendance/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Valid attendance ID is required");
}

#[actix_web::test]
async fn summary_on_empty_store_is_all_zero() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats/summary")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": {"total": 0, "present": 0, "absent": 0, "totalEmployees": 0}
        })
    );
}

#[actix_web::test]
async fn health_reports_environment() {
    let config = Config {
        environment: "staging".into(),
        ..Config::default()
    };
    let app = test_app!(Arc::new(InMemoryStore::new()), config);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["environment"], "staging");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn unknown_api_route_is_json_404() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Route /api/nope not found");
}

#[actix_web::test]
async fn method_mismatch_is_json_404() {
    let app = test_app!(Arc::new(InMemoryStore::new()));

    for req in [
        test::TestRequest::get().uri("/api/attendance/5"),
        test::TestRequest::put().uri("/api/attendance/5"),
        test::TestRequest::get().uri("/api/attendance/search"),
        test::TestRequest::delete().uri("/api/attendance/stats/summary"),
        test::TestRequest::patch().uri("/api/attendance"),
    ] {
        let req = req.to_request();
        let uri = req.uri().to_string();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], format!("Route {uri} not found"));
    }
}

/// Every call fails the way a broken backend would.
struct BrokenStore;

#[async_trait]
impl AttendanceStore for BrokenStore {
    async fn insert(&self, _: &NewAttendance) -> Result<u64, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn find_by_id(&self, _: u64) -> Result<Option<Attendance>, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn delete_by_id(&self, _: u64) -> Result<bool, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn list_paged(&self, _: u64, _: u64) -> Result<Vec<Attendance>, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn find_by_date(&self, _: &str, _: u64, _: u64) -> Result<Vec<Attendance>, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn list_by_employee(&self, _: &str, _: u64, _: u64) -> Result<Vec<Attendance>, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn search_by_name_or_id(
        &self,
        _: &str,
        _: u64,
        _: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
    async fn aggregate_counts(&self) -> Result<AttendanceSummary, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn exists_for_employee_on_date(&self, _: &str, _: &str) -> Result<bool, StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }
}

#[actix_web::test]
async fn internal_errors_show_detail_outside_production() {
    let app = test_app!(Arc::new(BrokenStore));

    let req = test::TestRequest::get().uri("/api/attendance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "disk on fire");
}

#[actix_web::test]
async fn internal_errors_are_scrubbed_in_production() {
    let config = Config {
        environment: "production".into(),
        ..Config::default()
    };
    let app = test_app!(Arc::new(BrokenStore), config);

    let req = test::TestRequest::get().uri("/api/attendance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"success": false, "error": "Internal server error"})
    );
}

#[actix_web::test]
async fn unavailable_store_is_503() {
    let app = test_app!(Arc::new(BrokenStore));

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats/summary")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Database connection failed. Please try again later.");
}
