//! Reporting API handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{DailyApprovalReportWorkflow, DailyReport};
use crate::error::ApiResult;
use crate::middleware::AdminUser;
use crate::models::ApiResponse;

/// GET /api/v1/reports/daily - Approved loans in the current report window
pub async fn get_daily_report(
    State(workflow): State<Arc<DailyApprovalReportWorkflow>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<ApiResponse<DailyReport>>> {
    let report = workflow.compute_daily_report().await?;
    Ok(Json(ApiResponse::ok(report)))
}
