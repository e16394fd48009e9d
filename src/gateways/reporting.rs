//! Reporting queue HTTP adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{check_response, GatewayError, ReportingGateway};
use crate::application::{Application, DailyReport};

/// Event counted by the approvals report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedCountEvent {
    pub application_id: Uuid,
    pub status: String,
    pub amount: Decimal,
    pub approved_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
enum ReportingMessage<'a> {
    ApprovedCount(ApprovedCountEvent),
    DailyReport(&'a DailyReport),
}

/// Publishes reporting events to the outbound queue bridge
#[derive(Clone)]
pub struct HttpReportingGateway {
    client: reqwest::Client,
    queue_url: String,
}

impl HttpReportingGateway {
    pub fn new(client: reqwest::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    async fn publish(&self, message: &ReportingMessage<'_>) -> Result<(), GatewayError> {
        let response = self.client.post(&self.queue_url).json(message).send().await?;
        check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ReportingGateway for HttpReportingGateway {
    async fn send_approved_count(
        &self,
        application: &Application,
        status_name: &str,
    ) -> Result<(), GatewayError> {
        let event = ApprovedCountEvent {
            application_id: application.id,
            status: status_name.to_string(),
            amount: application.amount,
            approved_at: application.approved_at,
        };

        self.publish(&ReportingMessage::ApprovedCount(event)).await?;
        tracing::info!(application_id = %application.id, "Approved count event queued");
        Ok(())
    }

    async fn send_daily_report(&self, report: &DailyReport) -> Result<(), GatewayError> {
        self.publish(&ReportingMessage::DailyReport(report)).await?;
        tracing::info!(
            approved_count = report.approved_count,
            total_amount = %report.total_amount,
            "Daily approval report queued"
        );
        Ok(())
    }
}
