//! Daily approval report

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use super::error::WorkflowError;
use super::model::{DailyReport, Status};
use super::repository::{ApplicationRepository, StatusRepository};
use crate::config::ConfigProvider;

pub struct DailyApprovalReportWorkflow {
    applications: Arc<dyn ApplicationRepository>,
    statuses: Arc<dyn StatusRepository>,
    config: Arc<dyn ConfigProvider>,
}

impl DailyApprovalReportWorkflow {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        statuses: Arc<dyn StatusRepository>,
        config: Arc<dyn ConfigProvider>,
    ) -> Self {
        Self {
            applications,
            statuses,
            config,
        }
    }

    pub async fn compute_daily_report(&self) -> Result<DailyReport, WorkflowError> {
        self.compute_at(Utc::now()).await
    }

    /// Report for the 24 hours ending at today's cutoff, with "today" taken at `now`
    pub async fn compute_at(&self, now: DateTime<Utc>) -> Result<DailyReport, WorkflowError> {
        let timezone = self.config.timezone();
        let tz: Tz = timezone
            .parse()
            .map_err(|_| WorkflowError::Configuration(format!("Invalid timezone: {}", timezone)))?;
        let (window_start, window_end) = report_window(now, tz, self.config.report_cutoff());

        let approved = self
            .statuses
            .find_by_name_ignore_case(Status::APPROVED)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Status not found: {}", Status::APPROVED)))?;

        let applications = self
            .applications
            .find_by_status_and_approved_between(approved.id, window_start, window_end)
            .await?;

        let (approved_count, total_amount) = applications
            .iter()
            .fold((0i64, Decimal::ZERO), |(count, total), application| {
                (count + 1, total + application.amount)
            });

        tracing::info!(
            %window_start,
            %window_end,
            approved_count,
            total_amount = %total_amount,
            "Daily approval report computed"
        );

        Ok(DailyReport {
            approved_count,
            total_amount,
            window_start,
            window_end,
        })
    }
}

/// `[today at cutoff − 24h, today at cutoff)` where "today" is `now`'s date in `tz`.
///
/// A cutoff falling into a DST gap is read as UTC wall time.
pub fn report_window(
    now: DateTime<Utc>,
    tz: Tz,
    cutoff: NaiveTime,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_cutoff = now.with_timezone(&tz).date_naive().and_time(cutoff);

    let end = tz
        .from_local_datetime(&local_cutoff)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local_cutoff));

    (end - Duration::hours(24), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(3, 0, 0).unwrap()
    }

    #[test]
    fn test_window_in_utc() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap();
        let (start, end) = report_window(now, Tz::UTC, cutoff());

        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 10, 3, 0, 0).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 9, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_window_uses_local_date() {
        // 02:00 UTC on the 10th is still the 9th in Bogota (UTC-5)
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 2, 0, 0).unwrap();
        let (start, end) = report_window(now, chrono_tz::America::Bogota, cutoff());

        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 9, 8, 0, 0).unwrap());
        assert_eq!(end - start, Duration::hours(24));
    }
}
