//! Reaction to external credit decisions

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::error::WorkflowError;
use super::model::{Application, DecisionMessage, DecisionResponse, Status};
use super::repository::{ApplicationRepository, LoanTypeRepository, StatusRepository};
use crate::gateways::NotificationGateway;
use crate::services::amortization;

/// Applies a decision message: status change, optional payment plan, notification
pub struct DecisionProcessingWorkflow {
    applications: Arc<dyn ApplicationRepository>,
    statuses: Arc<dyn StatusRepository>,
    loan_types: Arc<dyn LoanTypeRepository>,
    notifications: Arc<dyn NotificationGateway>,
}

impl DecisionProcessingWorkflow {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        statuses: Arc<dyn StatusRepository>,
        loan_types: Arc<dyn LoanTypeRepository>,
        notifications: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            applications,
            statuses,
            loan_types,
            notifications,
        }
    }

    pub async fn execute(&self, message: DecisionMessage) -> Result<(), WorkflowError> {
        let (application, status) = tokio::try_join!(
            self.find_application(message.application_id),
            self.find_status(&message.decision),
        )?;

        let updated = application.with_status(&status, Utc::now());

        let payment_plan = if message.decision.eq_ignore_ascii_case(Status::APPROVED) {
            let loan_type = self
                .loan_types
                .find_by_id(updated.loan_type_id)
                .await?
                .ok_or_else(|| {
                    WorkflowError::not_found(format!("Loan type not found: {}", updated.loan_type_id))
                })?;

            let term = u32::try_from(updated.term).unwrap_or_default();
            amortization::generate(updated.amount, loan_type.interest_rate, term)
        } else {
            Vec::new()
        };

        let saved = self.applications.save(updated).await?;

        let response = DecisionResponse {
            application_id: saved.id,
            email: saved.email.clone(),
            status_name: status.name.clone(),
            amount: saved.amount,
            term: saved.term,
            payment_plan,
        };

        self.notifications.send_decision_response(&response).await?;

        tracing::info!(
            application_id = %saved.id,
            decision = %message.decision,
            status = %status.name,
            plan_months = response.payment_plan.len(),
            "Decision processed"
        );

        Ok(())
    }

    async fn find_application(&self, id: Uuid) -> Result<Application, WorkflowError> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Application not found: {}", id)))
    }

    async fn find_status(&self, name: &str) -> Result<Status, WorkflowError> {
        self.statuses
            .find_by_name_ignore_case(name)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Status not found: {}", name)))
    }
}
