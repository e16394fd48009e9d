//! Advisor-driven status changes

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::error::WorkflowError;
use super::model::Application;
use super::repository::{ApplicationRepository, StatusRepository};
use crate::gateways::{NotificationGateway, ReportingGateway};

pub struct StatusTransitionWorkflow {
    applications: Arc<dyn ApplicationRepository>,
    statuses: Arc<dyn StatusRepository>,
    notifications: Arc<dyn NotificationGateway>,
    reporting: Arc<dyn ReportingGateway>,
}

impl StatusTransitionWorkflow {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        statuses: Arc<dyn StatusRepository>,
        notifications: Arc<dyn NotificationGateway>,
        reporting: Arc<dyn ReportingGateway>,
    ) -> Self {
        Self {
            applications,
            statuses,
            notifications,
            reporting,
        }
    }

    /// Move an application to `status_name` (matched case-insensitively).
    ///
    /// The notification is sent before the approval report; a failed report is
    /// returned as an error but does not undo the notification or the save.
    pub async fn update_status(
        &self,
        application_id: Uuid,
        status_name: &str,
    ) -> Result<Application, WorkflowError> {
        let status = self
            .statuses
            .find_by_name_ignore_case(status_name)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Invalid status: {}", status_name)))?;

        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Application not found"))?;

        let saved = self
            .applications
            .save(application.with_status(&status, Utc::now()))
            .await?;

        self.notifications
            .send_status_notification(&saved, &status.name)
            .await?;

        if status.is_approved() {
            self.reporting
                .send_approved_count(&saved, &status.name)
                .await
                .map_err(|err| {
                    tracing::error!(
                        application_id = %saved.id,
                        error = %err,
                        "Approved count report failed after notification was sent"
                    );
                    err
                })?;
        }

        tracing::info!(application_id = %saved.id, status = %status.name, "Application status updated");

        Ok(saved)
    }
}
