//! Persistence for attendance rows.
//!
//! The `(employee_id, date)` uniqueness rule is enforced here, not only in the
//! service, so a concurrent create that slips past the service check still
//! surfaces as [`StoreError::DuplicateKey`].

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use derive_more::Display;

use crate::model::attendance::{Attendance, AttendanceSummary, NewAttendance};

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum StoreError {
    #[display(fmt = "duplicate attendance for employee and date")]
    DuplicateKey,

    /// The store refused a value the validation layer let through.
    #[display(fmt = "invalid value: {}", _0)]
    InvalidValue(String),

    #[display(fmt = "store unavailable: {}", _0)]
    Unavailable(String),

    #[display(fmt = "store error: {}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return StoreError::DuplicateKey;
                }
                match db_err.code().as_deref() {
                    // incorrect / out-of-range date value
                    Some("22007") | Some("22008") => StoreError::InvalidValue(db_err.message().to_string()),
                    // access denied
                    Some("28000") => StoreError::Unavailable(db_err.message().to_string()),
                    _ => StoreError::Backend(e.to_string()),
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
            _ => StoreError::Backend(e.to_string()),
        }
    }
}

/// Operations the attendance service needs from a backing store.
///
/// Listing methods take a raw `offset`/`limit` window; the caller owns the
/// page arithmetic.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Inserts a row and returns its generated id.
    async fn insert(&self, record: &NewAttendance) -> Result<u64, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Attendance>, StoreError>;

    /// Returns whether a row was removed. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: u64) -> Result<bool, StoreError>;

    /// Ordered by `date` desc, then `created_at` desc.
    async fn list_paged(&self, offset: u64, limit: u64) -> Result<Vec<Attendance>, StoreError>;

    /// Ordered by `employee_name` asc.
    async fn find_by_date(
        &self,
        date: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError>;

    /// Ordered by `date` desc.
    async fn list_by_employee(
        &self,
        employee_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError>;

    /// Case-insensitive substring match on name or employee id, ordered by `date` desc.
    async fn search_by_name_or_id(
        &self,
        term: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError>;

    async fn aggregate_counts(&self) -> Result<AttendanceSummary, StoreError>;

    async fn exists_for_employee_on_date(
        &self,
        employee_id: &str,
        date: &str,
    ) -> Result<bool, StoreError>;
}
