//! Workflow error taxonomy

use thiserror::Error;

use super::repository::RepositoryError;
use crate::gateways::GatewayError;
use crate::services::InvalidAmount;

/// Error raised by the application workflows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    EntityNotFound(String),

    #[error("{0}")]
    InvalidAmount(String),

    #[error("Token validation failed: {0}")]
    TokenValidation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Gateway(GatewayError),
}

impl WorkflowError {
    pub fn not_found(message: impl Into<String>) -> Self {
        WorkflowError::EntityNotFound(message.into())
    }
}

impl From<InvalidAmount> for WorkflowError {
    fn from(err: InvalidAmount) -> Self {
        WorkflowError::InvalidAmount(err.0)
    }
}

impl From<GatewayError> for WorkflowError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::TokenValidation(message) => WorkflowError::TokenValidation(message),
            GatewayError::Unauthorized(message) => WorkflowError::Unauthorized(message),
            other => WorkflowError::Gateway(other),
        }
    }
}
