//! Route definitions for LendFlow API

mod applications;
mod decisions;
mod reports;

use axum::Router;

use crate::middleware;
use crate::state::AppState;

pub use applications::application_routes;
pub use decisions::decision_routes;
pub use reports::report_routes;

/// All API routes with request tracing applied
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(application_routes())
        .merge(decision_routes())
        .merge(report_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}
