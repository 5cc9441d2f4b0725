use actix_web::{HttpResponse, Responder, web};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::config::Config;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = Object, example = json!({
            "success": true,
            "message": "Server is healthy",
            "timestamp": "2024-03-01T08:00:00.000Z",
            "environment": "development"
        }))
    ),
    tag = "Health"
)]
pub async fn health(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Server is healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "environment": config.environment,
    }))
}
