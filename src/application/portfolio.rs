//! Advisor portfolio read model
//!
//! Joins a page of applications with applicant identities, loan types,
//! statuses and each applicant's current monthly debt. Identities are
//! resolved in one batch call; debt is aggregated once per applicant.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::try_join_all;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::WorkflowError;
use super::model::{AdvisorView, Application, LoanType, Status, UserIdentity};
use super::repository::{ApplicationRepository, LoanTypeRepository, StatusRepository};
use crate::gateways::AuthGateway;
use crate::models::{Page, PageRequest};
use crate::services::amortization;

pub struct AdvisorPortfolioView {
    applications: Arc<dyn ApplicationRepository>,
    statuses: Arc<dyn StatusRepository>,
    loan_types: Arc<dyn LoanTypeRepository>,
    auth: Arc<dyn AuthGateway>,
}

impl AdvisorPortfolioView {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        statuses: Arc<dyn StatusRepository>,
        loan_types: Arc<dyn LoanTypeRepository>,
        auth: Arc<dyn AuthGateway>,
    ) -> Self {
        Self {
            applications,
            statuses,
            loan_types,
            auth,
        }
    }

    /// Page of advisor rows for applications in any of `status_names`.
    ///
    /// Applications whose applicant cannot be resolved are left out of the page.
    pub async fn get_applications_by_status(
        &self,
        token: &str,
        status_names: &[String],
        page_request: &PageRequest,
    ) -> Result<Page<AdvisorView>, WorkflowError> {
        let statuses = self.statuses.find_by_names(status_names).await?;
        if statuses.is_empty() {
            tracing::debug!(?status_names, "No matching statuses, returning empty page");
            return Ok(Page::empty(page_request));
        }

        let status_ids: Vec<Uuid> = statuses.iter().map(|status| status.id).collect();
        let page = self
            .applications
            .find_by_status_in(&status_ids, page_request)
            .await?;

        if page.content.is_empty() {
            return Ok(page.with_content(Vec::new()));
        }

        let mut seen = HashSet::new();
        let user_ids: Vec<Uuid> = page
            .content
            .iter()
            .map(|application| application.user_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let users = self.auth.resolve_users_by_ids(&user_ids, token).await?;

        let approved_status_id = self
            .statuses
            .find_by_name(Status::APPROVED)
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found(format!("Status not found: {}", Status::APPROVED))
            })?
            .id;

        let debts: HashMap<Uuid, Decimal> = try_join_all(
            user_ids
                .iter()
                .filter(|id| users.contains_key(*id))
                .map(|id| async move {
                    let debt = self.total_monthly_debt(*id, approved_status_id).await?;
                    Ok::<_, WorkflowError>((*id, debt))
                }),
        )
        .await?
        .into_iter()
        .collect();

        let rows = try_join_all(page.content.iter().filter_map(|application| {
            match users.get(&application.user_id) {
                Some(user) => Some(self.build_row(application, user, &debts)),
                None => {
                    tracing::warn!(
                        application_id = %application.id,
                        user_id = %application.user_id,
                        "Applicant identity not resolved, skipping application"
                    );
                    None
                }
            }
        }))
        .await?;

        Ok(page.with_content(rows))
    }

    /// Sum of level monthly payments over the applicant's approved applications,
    /// rounded half-up to cents.
    pub async fn total_monthly_debt(
        &self,
        user_id: Uuid,
        approved_status_id: Uuid,
    ) -> Result<Decimal, WorkflowError> {
        let approved = self
            .applications
            .find_by_user_and_status(user_id, approved_status_id)
            .await?;

        let payments = try_join_all(approved.iter().map(|application| async move {
            let loan_type = self.find_loan_type(application.loan_type_id).await?;
            Ok::<_, WorkflowError>(amortization::level_payment(
                application.amount,
                loan_type.interest_rate,
                application.term,
            ))
        }))
        .await?;

        Ok(amortization::round_money(payments.into_iter().sum()))
    }

    async fn build_row(
        &self,
        application: &Application,
        user: &UserIdentity,
        debts: &HashMap<Uuid, Decimal>,
    ) -> Result<AdvisorView, WorkflowError> {
        let (loan_type, status) = tokio::try_join!(
            self.find_loan_type(application.loan_type_id),
            self.find_status(application.status_id),
        )?;

        Ok(AdvisorView {
            application_id: application.id,
            amount: application.amount,
            term: application.term,
            email: application.email.clone(),
            full_name: user.full_name(),
            loan_type: loan_type.name,
            interest_rate: loan_type.interest_rate,
            status: status.name,
            base_salary: user.base_salary,
            total_monthly_debt: debts
                .get(&application.user_id)
                .copied()
                .unwrap_or(Decimal::ZERO),
        })
    }

    async fn find_loan_type(&self, id: Uuid) -> Result<LoanType, WorkflowError> {
        self.loan_types
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Loan type not found: {}", id)))
    }

    async fn find_status(&self, id: Uuid) -> Result<Status, WorkflowError> {
        self.statuses
            .find_by_id(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Status not found: {}", id)))
    }
}
