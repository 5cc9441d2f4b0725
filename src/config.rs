use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub environment: String,
    pub api_prefix: String,

    // Database
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // CORS, ignored in development
    pub cors_allowed_origins: Vec<String>,

    // Rate limiting, 0 disables
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,

    pub log_dir: String,
    pub log_level: String,
    pub json_body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            port: 5000,
            environment: "development".to_string(),
            api_prefix: "/api".to_string(),

            db_host: "localhost".to_string(),
            db_port: 3306,
            db_user: "root".to_string(),
            db_password: String::new(),
            db_name: "attendance_tracker".to_string(),
            db_max_connections: 10,
            db_acquire_timeout_secs: 10,

            cors_allowed_origins: vec!["http://localhost:3000".to_string()],

            rate_limit_max_requests: 100,
            rate_limit_window_secs: 15 * 60,

            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
            json_body_limit: 10 * 1024 * 1024,
        }
    }
}

fn var_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let d = Self::default();

        Ok(Self {
            server_host: var_or("SERVER_HOST", d.server_host),
            port: parse_or("PORT", d.port)?,
            environment: var_or("APP_ENV", d.environment),
            api_prefix: var_or("API_PREFIX", d.api_prefix),

            db_host: var_or("DB_HOST", d.db_host),
            db_port: parse_or("DB_PORT", d.db_port)?,
            db_user: var_or("DB_USER", d.db_user),
            db_password: var_or("DB_PASSWORD", d.db_password),
            db_name: var_or("DB_NAME", d.db_name),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", d.db_max_connections)?,
            db_acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", d.db_acquire_timeout_secs)?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or(d.cors_allowed_origins),

            rate_limit_max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", d.rate_limit_max_requests)?,
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", d.rate_limit_window_secs)?,

            log_dir: var_or("LOG_DIR", d.log_dir),
            log_level: var_or("LOG_LEVEL", d.log_level),
            json_body_limit: parse_or("JSON_BODY_LIMIT", d.json_body_limit)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}
