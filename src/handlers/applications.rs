//! Loan application API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::application::{AdvisorView, Application, NewApplication, Status, WorkflowError};
use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdvisorUser, ClientUser};
use crate::models::{ApiResponse, Page, PageRequest, Sort};
use crate::state::AppState;

/// Request to register a new loan application
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterApplicationRequest {
    pub amount: Option<Decimal>,
    #[validate(range(min = 1, max = 600))]
    pub term: i32,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub document: String,
    pub loan_type_id: Uuid,
}

/// Request to move an application to another status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, max = 64))]
    pub status: String,
}

/// Query for the advisor portfolio listing
#[derive(Debug, Default, Deserialize)]
pub struct AdvisorApplicationsQuery {
    /// Comma-separated status names
    pub status: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field` or `field,asc|desc`
    pub sort: Option<String>,
}

impl AdvisorApplicationsQuery {
    /// Requested status names, defaulting to the statuses awaiting review
    pub fn status_names(&self) -> Vec<String> {
        let requested: Vec<String> = self
            .status
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if requested.is_empty() {
            [Status::PENDING_REVIEW, Status::REJECTED, Status::MANUAL_REVIEW]
                .iter()
                .map(|name| name.to_string())
                .collect()
        } else {
            requested
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(PageRequest::DEFAULT_SIZE),
            self.sort.as_deref().and_then(Sort::parse),
        )
    }
}

/// POST /api/v1/applications - Register an application for the authenticated client
pub async fn register_application(
    State(state): State<AppState>,
    ClientUser(user): ClientUser,
    Json(request): Json<RegisterApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Application>>)> {
    request.validate()?;

    let owner = state
        .auth_gateway
        .resolve_user_by_document(&request.document, &user.token)
        .await
        .map_err(WorkflowError::from)?;

    if owner.id != user.user_id {
        tracing::warn!(
            user_id = %user.user_id,
            document_owner = %owner.id,
            "Rejected application for a document owned by another user"
        );
        return Err(ApiError::Forbidden(
            "Document does not belong to the authenticated user".to_string(),
        ));
    }

    let application = state
        .registration
        .register(NewApplication {
            amount: request.amount,
            term: request.term,
            email: request.email,
            document: request.document,
            loan_type_id: request.loan_type_id,
            user_id: owner.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(application))))
}

/// GET /api/v1/applications - Advisor portfolio listing
pub async fn list_applications(
    State(state): State<AppState>,
    AdvisorUser(user): AdvisorUser,
    Query(query): Query<AdvisorApplicationsQuery>,
) -> ApiResult<Json<ApiResponse<Page<AdvisorView>>>> {
    let page = state
        .portfolio
        .get_applications_by_status(&user.token, &query.status_names(), &query.page_request())
        .await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// PUT /api/v1/applications/:id/status - Advisor status change
pub async fn update_application_status(
    State(state): State<AppState>,
    AdvisorUser(user): AdvisorUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<Application>>> {
    request.validate()?;

    tracing::info!(
        application_id = %id,
        advisor_id = %user.user_id,
        status = %request.status,
        "Status change requested"
    );

    let application = state
        .status_transitions
        .update_status(id, &request.status)
        .await?;

    Ok(Json(ApiResponse::ok(application)))
}
