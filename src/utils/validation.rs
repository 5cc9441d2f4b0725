use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::attendance::{AttendanceStatus, NewAttendance};
use crate::models::AttendancePayload;

/// Shape check only: `2024-13-40` passes, calendar validity is not checked here.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_SEARCH_LEN: usize = 2;

/// First rule a payload broke, with the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}", message)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn is_date(value: &str) -> bool {
    DATE_PATTERN.is_match(value)
}

/// Checks a create payload rule by rule and stops at the first failure.
/// On success the name and employee id come back trimmed.
pub fn validate_attendance(payload: &AttendancePayload) -> Result<NewAttendance, ValidationError> {
    let (Some(name), Some(employee_id), Some(date), Some(status)) = (
        present(&payload.employee_name),
        present(&payload.employee_id),
        present(&payload.date),
        present(&payload.status),
    ) else {
        let field = [
            ("employeeName", &payload.employee_name),
            ("employeeID", &payload.employee_id),
            ("date", &payload.date),
            ("status", &payload.status),
        ]
        .into_iter()
        .find(|(_, v)| present(*v).is_none())
        .map(|(f, _)| f)
        .unwrap_or("payload");
        return Err(ValidationError::new(
            field,
            "All fields are required: employeeName, employeeID, date, status",
        ));
    };

    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::new(
            "employeeName",
            "Employee name must be at least 2 characters long",
        ));
    }

    let employee_id = employee_id.trim();
    if employee_id.is_empty() {
        return Err(ValidationError::new("employeeID", "Employee ID is required"));
    }

    if !is_date(date) {
        return Err(ValidationError::new(
            "date",
            "Date must be in YYYY-MM-DD format",
        ));
    }

    let status = status.parse::<AttendanceStatus>().map_err(|_| {
        ValidationError::new("status", r#"Status must be either "Present" or "Absent""#)
    })?;

    Ok(NewAttendance {
        employee_name: name.to_string(),
        employee_id: employee_id.to_string(),
        date: date.to_string(),
        status,
    })
}

/// Returns the trimmed search term when it is long enough.
pub fn validate_search_term(term: &str) -> Result<&str, ValidationError> {
    let term = term.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(ValidationError::new(
            "query",
            "Search query must be at least 2 characters long",
        ));
    }
    Ok(term)
}
