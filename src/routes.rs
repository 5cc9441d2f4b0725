use crate::{
    api::{attendance, health},
    config::Config,
    error::{json_error_handler, route_not_found, scrub_internal_error},
};
use actix_cors::Cors;
use actix_governor::{
    GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{http::StatusCode, middleware::ErrorHandlers, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(config.json_body_limit)
            .error_handler(json_error_handler),
    );

    cfg.route("/health", web::get().to(health::health));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, scrub_internal_error))
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance))
                            .default_service(web::to(route_not_found)),
                    )
                    // /attendance/date/{date}
                    .service(
                        web::resource("/date/{date}")
                            .route(web::get().to(attendance::list_by_date))
                            .default_service(web::to(route_not_found)),
                    )
                    // /attendance/employee/{employee_id}
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(attendance::list_by_employee))
                            .default_service(web::to(route_not_found)),
                    )
                    // /attendance/search/{query}
                    .service(
                        web::resource("/search/{query}")
                            .route(web::get().to(attendance::search_attendance))
                            .default_service(web::to(route_not_found)),
                    )
                    // /attendance/stats/summary
                    .service(
                        web::resource("/stats/summary")
                            .route(web::get().to(attendance::summary))
                            .default_service(web::to(route_not_found)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::delete().to(attendance::delete_attendance))
                            .default_service(web::to(route_not_found)),
                    ),
            )
            .default_service(web::to(route_not_found)),
    );
}

/// Per-IP limiter allowing `max_requests` per `window_secs`, refilled evenly.
/// Returns `None` when limiting is disabled.
pub fn build_limiter(
    max_requests: u32,
    window_secs: u64,
) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    if max_requests == 0 {
        return None;
    }
    let per_ms = (window_secs.saturating_mul(1000) / max_requests as u64).max(1);
    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(max_requests)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

/// Any origin in development, the configured allow-list otherwise.
pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if config.is_development() {
        return cors.allow_any_origin();
    }

    config
        .cors_allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
