use actix_web::dev::ServiceResponse;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use derive_more::Display;
use tracing::{error, warn};

use crate::config::Config;
use crate::models::ErrorBody;
use crate::store::StoreError;
use crate::utils::validation::ValidationError;

pub const DUPLICATE_MESSAGE: &str =
    "Attendance already recorded for this employee on the specified date";

#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "{}", DUPLICATE_MESSAGE)]
    Conflict,

    #[display(fmt = "Attendance record not found")]
    NotFound,

    #[display(fmt = "Database connection failed. Please try again later.")]
    StoreUnavailable(String),

    /// Detail is shown outside production only.
    #[display(fmt = "{}", _0)]
    Unexpected(String),
}

impl std::error::Error for AttendanceError {}

impl From<ValidationError> for AttendanceError {
    fn from(e: ValidationError) -> Self {
        AttendanceError::Validation(e.message.to_string())
    }
}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey => AttendanceError::Conflict,
            StoreError::InvalidValue(detail) => {
                warn!(detail = %detail, "Store rejected a validated value");
                AttendanceError::Validation("Date must be a valid calendar date".to_string())
            }
            StoreError::Unavailable(detail) => AttendanceError::StoreUnavailable(detail),
            StoreError::Backend(detail) => AttendanceError::Unexpected(detail),
        }
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Conflict => StatusCode::CONFLICT,
            AttendanceError::NotFound => StatusCode::NOT_FOUND,
            AttendanceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AttendanceError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AttendanceError::StoreUnavailable(detail) = self {
            error!(detail = %detail, "Attendance store unavailable");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

/// Turns extractor failures on the JSON body into the standard 400 envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body too large".to_string()
        }
        other => format!("Invalid JSON body: {other}"),
    };
    let response = HttpResponse::BadRequest().json(ErrorBody::new(message));
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Fallback for unmatched routes.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new(format!("Route {} not found", req.uri())))
}

/// In production, 500 bodies are replaced so internal detail never leaves the process.
pub fn scrub_internal_error<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let production = res
        .request()
        .app_data::<Data<Config>>()
        .is_some_and(|c| c.is_production());

    if !production {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, _) = res.into_parts();
    let response = HttpResponse::InternalServerError()
        .json(ErrorBody::new("Internal server error"))
        .map_into_right_body();

    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, response)))
}

/// Shorthand used by handlers.
pub type AttendanceResult<T> = Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn store_errors_map_to_service_outcomes() {
        assert!(matches!(
            AttendanceError::from(StoreError::DuplicateKey),
            AttendanceError::Conflict
        ));
        assert!(matches!(
            AttendanceError::from(StoreError::InvalidValue("Incorrect DATE value".into())),
            AttendanceError::Validation(_)
        ));
        assert!(matches!(
            AttendanceError::from(StoreError::Unavailable("refused".into())),
            AttendanceError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AttendanceError::from(StoreError::Backend("boom".into())),
            AttendanceError::Unexpected(_)
        ));
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AttendanceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AttendanceError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(AttendanceError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AttendanceError::StoreUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AttendanceError::Unexpected("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn conflict_body_uses_envelope() {
        let response = AttendanceError::Conflict.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], DUPLICATE_MESSAGE);
    }
}
