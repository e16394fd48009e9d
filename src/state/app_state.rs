//! Application state shared across handlers

use std::sync::Arc;

use crate::application::{
    AdvisorPortfolioView, ApplicationRegistrationWorkflow, DailyApprovalReportWorkflow,
    DecisionProcessingWorkflow, StatusTransitionWorkflow,
};
use crate::auth::AuthSettings;
use crate::gateways::AuthGateway;

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<ApplicationRegistrationWorkflow>,
    pub decisions: Arc<DecisionProcessingWorkflow>,
    pub status_transitions: Arc<StatusTransitionWorkflow>,
    pub portfolio: Arc<AdvisorPortfolioView>,
    pub daily_report: Arc<DailyApprovalReportWorkflow>,
    pub auth_gateway: Arc<dyn AuthGateway>,
    pub auth_settings: Arc<AuthSettings>,
    pub decision_webhook_secret: Option<String>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registration: Arc<ApplicationRegistrationWorkflow>,
        decisions: Arc<DecisionProcessingWorkflow>,
        status_transitions: Arc<StatusTransitionWorkflow>,
        portfolio: Arc<AdvisorPortfolioView>,
        daily_report: Arc<DailyApprovalReportWorkflow>,
        auth_gateway: Arc<dyn AuthGateway>,
        auth_settings: Arc<AuthSettings>,
        decision_webhook_secret: Option<String>,
    ) -> Self {
        Self {
            registration,
            decisions,
            status_transitions,
            portfolio,
            daily_report,
            auth_gateway,
            auth_settings,
            decision_webhook_secret,
        }
    }
}

impl FromRef<AppState> for Arc<AuthSettings> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_settings.clone()
    }
}

impl FromRef<AppState> for Arc<DailyApprovalReportWorkflow> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.daily_report.clone()
    }
}
