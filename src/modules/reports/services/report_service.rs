use chrono::NaiveDate;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{DailyTotal, DashboardSummary, GroupTotal};
use crate::modules::reports::repositories::ReportRepository;

/// Service for the report endpoints; validates ranges and delegates
/// aggregation to the repository.
pub struct ReportService {
    report_repo: ReportRepository,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository) -> Self {
        Self { report_repo }
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.report_repo.dashboard_summary().await
    }

    pub async fn totals_by_method(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<GroupTotal>> {
        let (from, to) = self.validate_range(from, to)?;
        self.report_repo.totals_by_method(from, to).await
    }

    pub async fn totals_by_service(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<GroupTotal>> {
        let (from, to) = self.validate_range(from, to)?;
        self.report_repo.totals_by_service(from, to).await
    }

    pub async fn daily_totals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyTotal>> {
        let (from, to) = self.validate_range(from, to)?;
        self.report_repo.daily_totals(from, to).await
    }

    /// Validate a report range and widen it to inclusive day bounds
    fn validate_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> {
        if from > to {
            return Err(AppError::validation(format!(
                "Range start ({}) must be before or equal to range end ({})",
                from, to
            )));
        }

        let days = (to - from).num_days();
        if days > 366 {
            return Err(AppError::validation(format!(
                "Report range too large: {} days (maximum 366)",
                days
            )));
        }

        let start = from
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::internal("Invalid range start"))?
            .and_utc();
        let end = to
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| AppError::internal("Invalid range end"))?
            .and_utc();

        Ok((start, end))
    }
}
