use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{AttendanceError, AttendanceResult};
use crate::model::attendance::{Attendance, AttendanceSummary};
use crate::models::{AttendancePayload, Pagination};
use crate::store::AttendanceStore;
use crate::utils::pagination::PageRequest;
use crate::utils::validation::{validate_attendance, validate_search_term};

/// Use cases over the attendance table. Cheap to clone; every clone shares
/// the same store.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store }
    }

    /// Validates, pre-checks for a duplicate, then inserts. The store's unique
    /// key still decides when two creates race past the pre-check.
    #[instrument(name = "create_attendance", skip_all)]
    pub async fn create_attendance(&self, payload: &AttendancePayload) -> AttendanceResult<Attendance> {
        let record = validate_attendance(payload)?;

        if self
            .store
            .exists_for_employee_on_date(&record.employee_id, &record.date)
            .await?
        {
            warn!(employee_id = %record.employee_id, date = %record.date, "Duplicate attendance rejected");
            return Err(AttendanceError::Conflict);
        }

        let id = self.store.insert(&record).await?;
        info!(id, employee_id = %record.employee_id, date = %record.date, "Attendance recorded");

        self.store.find_by_id(id).await?.ok_or_else(|| {
            AttendanceError::Unexpected(format!("attendance {id} vanished after insert"))
        })
    }

    pub async fn list_attendance(
        &self,
        page: PageRequest,
    ) -> AttendanceResult<(Vec<Attendance>, Pagination)> {
        let rows = self.store.list_paged(page.offset(), page.limit()).await?;
        let pagination = page.pagination(rows.len());
        Ok((rows, pagination))
    }

    pub async fn list_by_date(
        &self,
        date: &str,
        page: PageRequest,
    ) -> AttendanceResult<(Vec<Attendance>, Pagination)> {
        let rows = self
            .store
            .find_by_date(date, page.offset(), page.limit())
            .await?;
        let pagination = page.pagination(rows.len());
        Ok((rows, pagination))
    }

    pub async fn list_by_employee(
        &self,
        employee_id: &str,
        page: PageRequest,
    ) -> AttendanceResult<(Vec<Attendance>, Pagination)> {
        let rows = self
            .store
            .list_by_employee(employee_id.trim(), page.offset(), page.limit())
            .await?;
        let pagination = page.pagination(rows.len());
        Ok((rows, pagination))
    }

    pub async fn search_attendance(
        &self,
        term: &str,
        page: PageRequest,
    ) -> AttendanceResult<(Vec<Attendance>, Pagination)> {
        let term = validate_search_term(term)?;
        let rows = self
            .store
            .search_by_name_or_id(term, page.offset(), page.limit())
            .await?;
        let pagination = page.pagination(rows.len());
        Ok((rows, pagination))
    }

    #[instrument(name = "delete_attendance", skip(self))]
    pub async fn delete_attendance(&self, id: u64) -> AttendanceResult<()> {
        if !self.store.delete_by_id(id).await? {
            return Err(AttendanceError::NotFound);
        }
        info!(id, "Attendance deleted");
        Ok(())
    }

    pub async fn get_summary(&self) -> AttendanceResult<AttendanceSummary> {
        Ok(self.store.aggregate_counts().await?)
    }
}
