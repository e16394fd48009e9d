//! Loan application models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Loan application model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub amount: Decimal,
    /// Term in months
    pub term: i32,
    pub email: String,
    pub document: String,
    pub status_id: Uuid,
    pub loan_type_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Copy of this application moved to `status`.
    ///
    /// Moving into the canonical "Approved" status stamps `approved_at`.
    pub fn with_status(&self, status: &Status, now: DateTime<Utc>) -> Self {
        Self {
            status_id: status.id,
            updated_at: now,
            approved_at: if status.is_approved() {
                Some(now)
            } else {
                self.approved_at
            },
            ..self.clone()
        }
    }
}

/// Intake data for a new application, before a status has been assigned
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub amount: Option<Decimal>,
    pub term: i32,
    pub email: String,
    pub document: String,
    pub loan_type_id: Uuid,
    pub user_id: Uuid,
}

impl NewApplication {
    pub(crate) fn into_application(
        self,
        amount: Decimal,
        status_id: Uuid,
        now: DateTime<Utc>,
    ) -> Application {
        Application {
            id: Uuid::new_v4(),
            amount,
            term: self.term,
            email: self.email,
            document: self.document,
            status_id,
            loan_type_id: self.loan_type_id,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
            approved_at: None,
        }
    }
}

/// Lending product definition (read-only reference data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoanType {
    pub id: Uuid,
    pub name: String,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    /// Annual interest rate as a percentage (12 means 12%)
    pub interest_rate: Decimal,
    pub automatic_validation: bool,
}

/// Named lifecycle state of an application (read-only reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Status {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl Status {
    pub const PENDING_REVIEW: &'static str = "Pending Review";
    pub const APPROVED: &'static str = "Approved";
    pub const REJECTED: &'static str = "Rejected";
    pub const MANUAL_REVIEW: &'static str = "Manual Review";

    /// Exact comparison against the canonical stored name
    pub fn is_approved(&self) -> bool {
        self.name == Self::APPROVED
    }
}

/// One line of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanEntry {
    /// 1-based month index
    pub month: u32,
    pub payment: Decimal,
    pub principal: Decimal,
    pub interest: Decimal,
    /// Remaining balance after this payment
    pub balance: Decimal,
}

/// Applicant identity as returned by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub document: String,
    pub base_salary: Decimal,
}

impl UserIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Caller identity confirmed by document lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedUser {
    pub id: Uuid,
    pub email: String,
    pub document: String,
    pub role: String,
}

/// Read-model row for advisor review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorView {
    pub application_id: Uuid,
    pub amount: Decimal,
    pub term: i32,
    pub email: String,
    pub full_name: String,
    pub loan_type: String,
    pub interest_rate: Decimal,
    pub status: String,
    pub base_salary: Decimal,
    pub total_monthly_debt: Decimal,
}

/// Approved-loan totals for one reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub approved_count: i64,
    pub total_amount: Decimal,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

/// Inbound credit decision for one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMessage {
    pub application_id: Uuid,
    pub decision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Outbound payload sent after a decision has been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub application_id: Uuid,
    pub email: String,
    pub status_name: String,
    pub amount: Decimal,
    pub term: i32,
    pub payment_plan: Vec<PaymentPlanEntry>,
}
