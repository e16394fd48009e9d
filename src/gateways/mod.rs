//! Outbound collaborators: identity resolution, notifications and reporting
//!
//! Each collaborator is a single trait; the HTTP adapters in the submodules
//! are the production implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::{Application, DailyReport, DecisionResponse, UserIdentity, ValidatedUser};

mod auth;
mod notification;
mod reporting;

pub use auth::HttpAuthGateway;
pub use notification::{HttpNotificationGateway, StatusNotification};
pub use reporting::{ApprovedCountEvent, HttpReportingGateway};

/// Gateway errors
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Token validation failed: {0}")]
    TokenValidation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unexpected response {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Resolve the user owning `document`, authorized by the caller's bearer token
    async fn resolve_user_by_document(
        &self,
        document: &str,
        token: &str,
    ) -> Result<ValidatedUser, GatewayError>;

    /// Batch identity lookup; unknown ids are simply absent from the map
    async fn resolve_users_by_ids(
        &self,
        ids: &[Uuid],
        token: &str,
    ) -> Result<HashMap<Uuid, UserIdentity>, GatewayError>;
}

#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_status_notification(
        &self,
        application: &Application,
        status_name: &str,
    ) -> Result<(), GatewayError>;

    async fn send_decision_response(&self, payload: &DecisionResponse) -> Result<(), GatewayError>;
}

#[async_trait]
pub trait ReportingGateway: Send + Sync {
    async fn send_approved_count(
        &self,
        application: &Application,
        status_name: &str,
    ) -> Result<(), GatewayError>;

    async fn send_daily_report(&self, report: &DailyReport) -> Result<(), GatewayError>;
}

/// Map a non-success response into a [`GatewayError`]
pub(crate) async fn check_response(
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 => GatewayError::TokenValidation(body),
        403 => GatewayError::Unauthorized(body),
        code => GatewayError::Status { status: code, body },
    })
}
