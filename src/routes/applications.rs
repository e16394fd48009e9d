//! Loan application route definitions

use axum::{
    routing::{get, put},
    Router,
};

use crate::handlers::*;
use crate::state::AppState;

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/applications",
            get(list_applications).post(register_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            put(update_application_status),
        )
}
