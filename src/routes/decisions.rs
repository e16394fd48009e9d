//! Decision webhook route definitions

use axum::{routing::post, Router};

use crate::handlers::*;
use crate::state::AppState;

pub fn decision_routes() -> Router<AppState> {
    Router::new().route("/api/v1/decisions", post(receive_decision))
}
