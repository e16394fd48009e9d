//! Reporting route definitions

use axum::{routing::get, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/api/v1/reports/daily", get(get_daily_report))
}
