use std::sync::Arc;

use actix_governor::Governor;
use actix_web::middleware::{Condition, Logger, NormalizePath};
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use anyhow::Context;

use attendance_tracker::config::Config;
use attendance_tracker::db::init_db;
use attendance_tracker::docs::ApiDoc;
use attendance_tracker::error::route_not_found;
use attendance_tracker::routes::{self, build_limiter, cors};
use attendance_tracker::service::AttendanceService;
use attendance_tracker::store::MySqlStore;

use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(
        environment = %config.environment,
        addr = %config.server_addr(),
        api_prefix = %config.api_prefix,
        "Attendance tracker starting"
    );

    let pool = init_db(&config)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to MySQL at {}:{}",
                config.db_host, config.db_port
            )
        })?;

    let service = Data::new(AttendanceService::new(Arc::new(MySqlStore::new(pool.clone()))));
    let config_data = Data::new(config.clone());
    let server_addr = config.server_addr();

    let limiter = build_limiter(config.rate_limit_max_requests, config.rate_limit_window_secs);
    if limiter.is_none() {
        warn!("Rate limiting disabled");
    }
    // Condition needs a middleware either way; an unused default stands in when disabled
    let rate_limited = limiter.is_some();
    let limiter = match limiter {
        Some(l) => l,
        None => build_limiter(1, 1).context("Failed to build rate limiter")?,
    };

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(rate_limited, Governor::new(&limiter)))
            .wrap(cors(&config))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .app_data(service.clone())
            .configure(|cfg| routes::configure(cfg, &config))
            .default_service(web::to(route_not_found))
    })
    .bind(&server_addr)?
    .shutdown_timeout(30)
    .run()
    .await?;

    // HttpServer returns once in-flight requests have drained
    pool.close().await;
    info!("Server stopped, database pool closed");

    Ok(())
}
