use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection, MySqlPool};
use tracing::info;

use crate::config::Config;

const CREATE_ATTENDANCE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id INT AUTO_INCREMENT PRIMARY KEY,
        employeeName VARCHAR(255) NOT NULL,
        employeeID VARCHAR(100) NOT NULL,
        date DATE NOT NULL,
        status ENUM('Present', 'Absent') NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        INDEX idx_employee_id (employeeID),
        INDEX idx_date (date),
        INDEX idx_status (status),
        UNIQUE KEY unique_attendance (employeeID, date)
    )
"#;

fn server_options(config: &Config) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
}

/// Creates the database if needed and opens a bounded pool on it.
pub async fn init_db(config: &Config) -> Result<MySqlPool, sqlx::Error> {
    let mut conn = server_options(config).connect().await?;
    // identifiers cannot be bound; backticks keep names like `my-db` valid
    let create_db = format!(
        "CREATE DATABASE IF NOT EXISTS `{}`",
        config.db_name.replace('`', "``")
    );
    sqlx::query(&create_db).execute(&mut conn).await?;
    conn.close().await?;
    info!(database = %config.db_name, "Database ensured");

    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_with(server_options(config).database(&config.db_name))
        .await?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_ATTENDANCE_TABLE).execute(pool).await?;
    info!("Attendance table ensured");
    Ok(())
}
