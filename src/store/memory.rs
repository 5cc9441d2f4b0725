use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceSummary, NewAttendance};

#[derive(Default)]
struct Table {
    /// Last id handed out; ids are never reused.
    last_id: u64,
    rows: BTreeMap<u64, Attendance>,
}

/// Process-local store that orders rows like [`super::MySqlStore`] and enforces the
/// same one-row-per-employee-per-day key. Used by tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryStore {
    table: Mutex<Table>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|_| StoreError::Backend("in-memory table lock poisoned".into()))
    }
}

fn window(rows: Vec<Attendance>, offset: u64, limit: u64) -> Vec<Attendance> {
    rows.into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn insert(&self, record: &NewAttendance) -> Result<u64, StoreError> {
        let mut table = self.lock()?;

        let duplicate = table
            .rows
            .values()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date);
        if duplicate {
            return Err(StoreError::DuplicateKey);
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Utc::now();
        table.rows.insert(
            id,
            Attendance {
                id,
                employee_name: record.employee_name.clone(),
                employee_id: record.employee_id.clone(),
                date: record.date.clone(),
                status: record.status,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Attendance>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    async fn list_paged(&self, offset: u64, limit: u64) -> Result<Vec<Attendance>, StoreError> {
        let mut rows: Vec<Attendance> = self.lock()?.rows.values().cloned().collect();
        // id breaks created_at ties between rows inserted within the same instant
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(window(rows, offset, limit))
    }

    async fn find_by_date(
        &self,
        date: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        let mut rows: Vec<Attendance> = self
            .lock()?
            .rows
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        // MySQL's default collation orders names without regard to case
        rows.sort_by_cached_key(|r| (r.employee_name.to_lowercase(), r.employee_name.clone()));
        Ok(window(rows, offset, limit))
    }

    async fn list_by_employee(
        &self,
        employee_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        let mut rows: Vec<Attendance> = self
            .lock()?
            .rows
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(window(rows, offset, limit))
    }

    async fn search_by_name_or_id(
        &self,
        term: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Attendance>, StoreError> {
        let needle = term.to_lowercase();
        let mut rows: Vec<Attendance> = self
            .lock()?
            .rows
            .values()
            .filter(|r| {
                r.employee_name.to_lowercase().contains(&needle)
                    || r.employee_id.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(window(rows, offset, limit))
    }

    async fn aggregate_counts(&self) -> Result<AttendanceSummary, StoreError> {
        let table = self.lock()?;
        let mut summary = AttendanceSummary::default();
        let mut employees = HashSet::new();

        for row in table.rows.values() {
            summary.total += 1;
            match row.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
            employees.insert(row.employee_id.as_str());
        }
        summary.total_employees = employees.len() as i64;

        Ok(summary)
    }

    async fn exists_for_employee_on_date(
        &self,
        employee_id: &str,
        date: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .any(|r| r.employee_id == employee_id && r.date == date))
    }
}
