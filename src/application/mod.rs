//! Loan application domain module
//!
//! Contains models, collaborator contracts and the decision/eligibility workflows.

mod decision;
mod error;
mod model;
mod portfolio;
mod registration;
mod report;
mod repository;
mod status_transition;

pub use decision::DecisionProcessingWorkflow;
pub use error::WorkflowError;
pub use model::*;
pub use portfolio::AdvisorPortfolioView;
pub use registration::ApplicationRegistrationWorkflow;
pub use report::{report_window, DailyApprovalReportWorkflow};
pub use repository::{
    ApplicationRepository, LoanTypeRepository, RepositoryError, StatusRepository,
    TransactionScope, UnitOfWork,
};
pub use status_transition::StatusTransitionWorkflow;
