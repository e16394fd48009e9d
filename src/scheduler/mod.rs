//! Background daily approval report
//!
//! A UTC cron tick runs every minute; the report fires on the tick that lands in
//! the minute after today's cutoff in the configured timezone. Offsets and DST
//! follow `report_window`, so the job and the window it reports always agree.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::application::{report_window, DailyApprovalReportWorkflow, DailyReport};
use crate::gateways::ReportingGateway;

/// Cron expression (with seconds, UTC) for the minute tick
pub const MINUTE_TICK: &str = "0 * * * * *";

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler error: {0}")]
    Job(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        SchedulerError::Job(format!("{:?}", err))
    }
}

/// True when `now` falls in the minute starting at today's cutoff in `tz`
pub fn report_due(now: DateTime<Utc>, tz: Tz, cutoff: NaiveTime) -> bool {
    let (_, cutoff_at) = report_window(now, tz, cutoff);
    let elapsed = now - cutoff_at;
    elapsed >= Duration::zero() && elapsed < Duration::minutes(1)
}

/// Compute the report and hand it to the reporting gateway.
///
/// Failures are logged; the report is returned only when it was computed.
pub async fn run_daily_report(
    workflow: &DailyApprovalReportWorkflow,
    reporting: &dyn ReportingGateway,
) -> Option<DailyReport> {
    let report = match workflow.compute_daily_report().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Error computing daily report: {}", e);
            return None;
        }
    };

    if let Err(e) = reporting.send_daily_report(&report).await {
        tracing::error!("Error sending daily report: {}", e);
    }

    Some(report)
}

/// Build the daily report job for `cutoff` in `tz`
pub fn daily_report_job(
    workflow: Arc<DailyApprovalReportWorkflow>,
    reporting: Arc<dyn ReportingGateway>,
    tz: Tz,
    cutoff: NaiveTime,
) -> Result<Job, SchedulerError> {
    let job = Job::new_async(MINUTE_TICK, move |_id, _scheduler| {
        let workflow = workflow.clone();
        let reporting = reporting.clone();
        Box::pin(async move {
            if report_due(Utc::now(), tz, cutoff) {
                run_daily_report(&workflow, reporting.as_ref()).await;
            }
        })
    })?;

    Ok(job)
}

/// Register and start the daily report job. The returned scheduler must be kept alive.
pub async fn start_daily_report_job(
    workflow: Arc<DailyApprovalReportWorkflow>,
    reporting: Arc<dyn ReportingGateway>,
    tz: Tz,
    cutoff: NaiveTime,
) -> Result<JobScheduler, SchedulerError> {
    let scheduler = JobScheduler::new().await?;
    scheduler
        .add(daily_report_job(workflow, reporting, tz, cutoff)?)
        .await?;
    scheduler.start().await?;

    tracing::info!(%cutoff, timezone = %tz, "Daily report job scheduled");

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(3, 0, 0).unwrap()
    }

    #[test]
    fn test_due_at_utc_cutoff() {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 3, 0, 0).unwrap();
        assert!(report_due(at, Tz::UTC, cutoff()));
        assert!(report_due(at + Duration::seconds(59), Tz::UTC, cutoff()));
        assert!(!report_due(at + Duration::minutes(1), Tz::UTC, cutoff()));
        assert!(!report_due(at - Duration::minutes(1), Tz::UTC, cutoff()));
    }

    #[test]
    fn test_due_follows_configured_timezone() {
        // 03:00 in Bogota (UTC-5) is 08:00 UTC
        let tz = chrono_tz::America::Bogota;
        assert!(report_due(Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap(), tz, cutoff()));
        assert!(!report_due(Utc.with_ymd_and_hms(2024, 5, 10, 3, 0, 0).unwrap(), tz, cutoff()));
    }

    #[test]
    fn test_due_tracks_daylight_saving() {
        let tz = chrono_tz::Europe::Madrid;
        // CET (UTC+1) in January, CEST (UTC+2) in July
        assert!(report_due(Utc.with_ymd_and_hms(2024, 1, 15, 2, 0, 0).unwrap(), tz, cutoff()));
        assert!(report_due(Utc.with_ymd_and_hms(2024, 7, 15, 1, 0, 0).unwrap(), tz, cutoff()));
        assert!(!report_due(Utc.with_ymd_and_hms(2024, 7, 15, 2, 0, 0).unwrap(), tz, cutoff()));
    }

    #[test]
    fn test_due_with_half_hour_offset() {
        // 03:00 in Kolkata (UTC+5:30) is 21:30 UTC the day before
        let tz = chrono_tz::Asia::Kolkata;
        let at = Utc.with_ymd_and_hms(2024, 5, 9, 21, 30, 0).unwrap();
        assert!(report_due(at, tz, cutoff()));
        assert!(!report_due(at - Duration::minutes(30), tz, cutoff()));
    }
}
