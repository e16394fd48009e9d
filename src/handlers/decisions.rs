//! Inbound credit decision webhook

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::application::DecisionMessage;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// POST /api/v1/decisions - Apply a decision delivered by the queue bridge
///
/// Failures are returned as non-2xx responses so the bridge redelivers.
pub async fn receive_decision(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(message): Json<DecisionMessage>,
) -> ApiResult<StatusCode> {
    if let Some(expected) = state.decision_webhook_secret.as_deref() {
        let provided = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected) {
            return Err(ApiError::Unauthorized("Invalid webhook secret".to_string()));
        }
    }

    tracing::info!(
        application_id = %message.application_id,
        decision = %message.decision,
        "Decision message received"
    );

    state.decisions.execute(message).await?;

    Ok(StatusCode::ACCEPTED)
}
