//! Notification queue HTTP adapter

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{check_response, GatewayError, NotificationGateway};
use crate::application::{Application, DecisionResponse};

/// Status-change notice delivered to the applicant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusNotification {
    pub application_id: Uuid,
    pub email: String,
    pub status: String,
    pub amount: Decimal,
    pub term: i32,
}

#[derive(Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
enum NotificationMessage<'a> {
    StatusNotification(StatusNotification),
    DecisionResponse(&'a DecisionResponse),
}

/// Publishes notifications to the outbound queue bridge
#[derive(Clone)]
pub struct HttpNotificationGateway {
    client: reqwest::Client,
    queue_url: String,
}

impl HttpNotificationGateway {
    pub fn new(client: reqwest::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    async fn publish(&self, message: &NotificationMessage<'_>) -> Result<(), GatewayError> {
        let response = self.client.post(&self.queue_url).json(message).send().await?;
        check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn send_status_notification(
        &self,
        application: &Application,
        status_name: &str,
    ) -> Result<(), GatewayError> {
        let notification = StatusNotification {
            application_id: application.id,
            email: application.email.clone(),
            status: status_name.to_string(),
            amount: application.amount,
            term: application.term,
        };

        self.publish(&NotificationMessage::StatusNotification(notification))
            .await?;
        tracing::info!(application_id = %application.id, status = %status_name, "Status notification queued");
        Ok(())
    }

    async fn send_decision_response(&self, payload: &DecisionResponse) -> Result<(), GatewayError> {
        self.publish(&NotificationMessage::DecisionResponse(payload))
            .await?;
        tracing::info!(
            application_id = %payload.application_id,
            status = %payload.status_name,
            plan_months = payload.payment_plan.len(),
            "Decision response queued"
        );
        Ok(())
    }
}
