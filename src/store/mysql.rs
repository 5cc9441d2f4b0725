use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool, Row};
use tracing::{debug, error};

use super::{AttendanceStore, StoreError};
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceSummary, NewAttendance};

/// `date` and `status` are read back as plain strings so that a DATE column
/// round-trips as the literal `YYYY-MM-DD` and the ENUM decodes without a
/// dedicated sqlx type.
const SELECT_COLUMNS: &str = r#"
    CAST(id AS UNSIGNED) AS id,
    employeeName,
    employeeID,
    DATE_FORMAT(date, '%Y-%m-%d') AS date,
    CAST(status AS CHAR) AS status,
    created_at,
    updated_at
"#;

impl<'r> FromRow<'r, MySqlRow> for Attendance {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<AttendanceStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Attendance {
            id: row.try_get("id")?,
            employee_name: row.try_get("employeeName")?,
            employee_id: row.try_get("employeeID")?,
            date: row.try_get("date")?,
            status,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// MySQL-backed store sharing one connection pool across requests.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// Classifies a sqlx failure and logs it, except for duplicate keys which are
/// an expected outcome of concurrent creates.
fn store_err(op: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |e| {
        let err = StoreError::from(e);
        if err != StoreError::DuplicateKey {
            error!(error = %err, op, "Attendance query failed");
        }
        err
    }
}

/// Escapes LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn insert(&self, record: &NewAttendance) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employeeName, employeeID, date, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.employee_name)
        .bind(&record.employee_id)
        .bind(&record.date)
        .bind(record.status.as_ref())
        .execute(&self.pool)
        .await
        .map_err(store_err("insert"))?;

        Ok(result.last_insert_id())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Attendance>, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM attendance WHERE id = ?");
        sqlx::query_as::<_, Attendance>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err("find_by_id"))
    }

    async fn delete_by_id(&self, id: u64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err("delete_by_id"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_paged(&self, offset: u64, limit: u64) -> Result<Vec<Attendance>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM attendance \
             ORDER BY date DESC, created_at DESC LIMIT ? OFFSET ?"
        );
        debug!(offset, limit, "Fetching attendance page");

        sqlx::query_as::<_, Attendance>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err("list_paged"))
    }

    async fn find_by_date(
        &self,
        date: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM attendance \
             WHERE date = ? ORDER BY employeeName ASC LIMIT ? OFFSET ?"
        );

        sqlx::query_as::<_, Attendance>(&sql)
            .bind(date)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err("find_by_date"))
    }

    async fn list_by_employee(
        &self,
        employee_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM attendance \
             WHERE employeeID = ? ORDER BY date DESC LIMIT ? OFFSET ?"
        );

        sqlx::query_as::<_, Attendance>(&sql)
            .bind(employee_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err("list_by_employee"))
    }

    async fn search_by_name_or_id(
        &self,
        term: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM attendance \
             WHERE LOWER(employeeName) LIKE ? OR LOWER(employeeID) LIKE ? \
             ORDER BY date DESC LIMIT ? OFFSET ?"
        );
        let pattern = like_pattern(term);
        debug!(pattern = %pattern, offset, limit, "Searching attendance");

        sqlx::query_as::<_, Attendance>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(store_err("search_by_name_or_id"))
    }

    async fn aggregate_counts(&self) -> Result<AttendanceSummary, StoreError> {
        // SUM over an empty table is NULL and a DECIMAL otherwise.
        sqlx::query_as::<_, AttendanceSummary>(
            r#"
            SELECT
                COUNT(*) AS total,
                CAST(COALESCE(SUM(CASE WHEN status = 'Present' THEN 1 ELSE 0 END), 0) AS SIGNED) AS present,
                CAST(COALESCE(SUM(CASE WHEN status = 'Absent' THEN 1 ELSE 0 END), 0) AS SIGNED) AS absent,
                COUNT(DISTINCT employeeID) AS total_employees
            FROM attendance
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("aggregate_counts"))
    }

    async fn exists_for_employee_on_date(
        &self,
        employee_id: &str,
        date: &str,
    ) -> Result<bool, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE employeeID = ? AND date = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("exists_for_employee_on_date"))?;

        Ok(count > 0)
    }
}
