//! New-application intake

use std::sync::Arc;

use chrono::Utc;

use super::error::WorkflowError;
use super::model::{Application, NewApplication, Status};
use super::repository::TransactionScope;
use crate::services::eligibility;

/// Registers applications inside a single unit of work
pub struct ApplicationRegistrationWorkflow {
    transactions: Arc<dyn TransactionScope>,
}

impl ApplicationRegistrationWorkflow {
    pub fn new(transactions: Arc<dyn TransactionScope>) -> Self {
        Self { transactions }
    }

    /// Validate the requested amount against its loan type and persist the
    /// application as "Pending Review".
    ///
    /// Nothing is committed unless every step succeeds.
    pub async fn register(&self, request: NewApplication) -> Result<Application, WorkflowError> {
        let mut uow = self.transactions.begin().await?;

        let loan_type = uow
            .find_loan_type(request.loan_type_id)
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found(format!("Loan type not found: {}", request.loan_type_id))
            })?;

        let amount = eligibility::validate(request.amount, &loan_type)?;

        let status = uow
            .find_status_by_name(Status::PENDING_REVIEW)
            .await?
            .ok_or_else(|| {
                tracing::error!(status = Status::PENDING_REVIEW, "Default status is not configured");
                WorkflowError::not_found(format!("Status not found: {}", Status::PENDING_REVIEW))
            })?;

        let application = request.into_application(amount, status.id, Utc::now());
        let saved = uow.save_application(application).await?;
        uow.commit().await?;

        tracing::info!(
            application_id = %saved.id,
            loan_type = %loan_type.name,
            amount = %saved.amount,
            "Application registered"
        );

        Ok(saved)
    }
}
