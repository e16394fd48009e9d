//! LendFlow Backend Server
//!
//! Serves loan application intake, advisor status changes, credit decision
//! webhooks and the daily approval report.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lendflow_server::application::{
    AdvisorPortfolioView, ApplicationRegistrationWorkflow, DailyApprovalReportWorkflow,
    DecisionProcessingWorkflow, StatusTransitionWorkflow,
};
use lendflow_server::auth::AuthSettings;
use lendflow_server::config::{Config, ConfigProvider};
use lendflow_server::db::{
    self, PgApplicationRepository, PgLoanTypeRepository, PgStatusRepository, PgTransactionScope,
};
use lendflow_server::gateways::{
    HttpAuthGateway, HttpNotificationGateway, HttpReportingGateway,
};
use lendflow_server::routes;
use lendflow_server::scheduler;
use lendflow_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting LendFlow server");

    let db_pool = db::create_pool(&config).await?;

    // Repositories
    let applications = Arc::new(PgApplicationRepository::new(db_pool.clone()));
    let loan_types = Arc::new(PgLoanTypeRepository::new(db_pool.clone()));
    let statuses = Arc::new(PgStatusRepository::new(db_pool.clone()));
    let transactions = Arc::new(PgTransactionScope::new(db_pool.clone()));

    // Gateways
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to build HTTP client")?;
    let auth_gateway = Arc::new(HttpAuthGateway::new(
        http_client.clone(),
        config.auth_service_url.clone(),
    ));
    let notifications = Arc::new(HttpNotificationGateway::new(
        http_client.clone(),
        config.notification_queue_url.clone(),
    ));
    let reporting = Arc::new(HttpReportingGateway::new(
        http_client,
        config.reporting_queue_url.clone(),
    ));

    // Workflows
    let registration = Arc::new(ApplicationRegistrationWorkflow::new(transactions));
    let decisions = Arc::new(DecisionProcessingWorkflow::new(
        applications.clone(),
        statuses.clone(),
        loan_types.clone(),
        notifications.clone(),
    ));
    let status_transitions = Arc::new(StatusTransitionWorkflow::new(
        applications.clone(),
        statuses.clone(),
        notifications,
        reporting.clone(),
    ));
    let portfolio = Arc::new(AdvisorPortfolioView::new(
        applications.clone(),
        statuses.clone(),
        loan_types,
        auth_gateway.clone(),
    ));
    let daily_report = Arc::new(DailyApprovalReportWorkflow::new(
        applications,
        statuses,
        Arc::new(config.clone()),
    ));

    let app_state = AppState::new(
        registration,
        decisions,
        status_transitions,
        portfolio,
        daily_report.clone(),
        auth_gateway,
        Arc::new(AuthSettings::new(config.jwt_secret.clone())),
        config.decision_webhook_secret.clone(),
    );

    if app_state.decision_webhook_secret.is_none() {
        tracing::warn!("DECISION_WEBHOOK_SECRET not set, decision webhook is unauthenticated");
    }

    // Start daily report job in background
    let _report_scheduler = scheduler::start_daily_report_job(
        daily_report,
        reporting,
        config.timezone,
        config.report_cutoff(),
    )
    .await?;

    // Clone db_pool for health check
    let health_db_pool = db_pool.clone();

    let app = Router::new()
        .route("/health", get(move || health_check(health_db_pool.clone())))
        .merge(routes::api_router(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    version: String,
}

/// Health check endpoint
async fn health_check(pool: sqlx::PgPool) -> axum::Json<HealthResponse> {
    let (status, database) = match db::check_health(&pool).await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => ("unhealthy", format!("error: {}", e)),
    };

    axum::Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
