//! Configuration management for LendFlow
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::str::FromStr;

use chrono::NaiveTime;
use chrono_tz::Tz;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Runtime settings consumed by the workflows
pub trait ConfigProvider: Send + Sync {
    /// IANA timezone name used for report windows
    fn timezone(&self) -> String;

    /// Local time at which the daily report window closes
    fn report_cutoff(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(DEFAULT_REPORT_CUTOFF_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

pub const DEFAULT_TIMEZONE: &str = "America/Bogota";
pub const DEFAULT_REPORT_CUTOFF_HOUR: u32 = 3;

/// Application environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Current environment
    pub environment: Environment,

    /// Server port
    pub port: u16,

    /// Maximum database connections
    pub db_max_connections: u32,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Secret used to verify HS256 access tokens
    pub jwt_secret: String,

    /// Base URL of the auth/user service
    pub auth_service_url: String,

    /// Outbound queue bridge for applicant notifications
    pub notification_queue_url: String,

    /// Outbound queue bridge for reporting events
    pub reporting_queue_url: String,

    /// Shared secret expected on inbound decision webhooks
    pub decision_webhook_secret: Option<String>,

    /// IANA timezone for the daily report window
    pub timezone: Tz,

    /// Hour (0-23, local) at which the daily report window closes
    pub report_cutoff_hour: u32,

    /// CORS allowed origins
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .map(|s| s.parse::<Environment>())
            .unwrap_or(Ok(Environment::Development))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .unwrap_or(5);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "development-secret-change-in-production".to_string());
        if environment.is_production() && env::var("JWT_SECRET").is_err() {
            return Err(ConfigError::MissingEnvVar("JWT_SECRET".to_string()));
        }

        let auth_service_url =
            env::var("AUTH_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());

        let notification_queue_url = env::var("NOTIFICATION_QUEUE_URL")
            .unwrap_or_else(|_| "http://localhost:9324/queues/notifications".to_string());

        let reporting_queue_url = env::var("REPORTING_QUEUE_URL")
            .unwrap_or_else(|_| "http://localhost:9324/queues/reporting".to_string());

        let decision_webhook_secret = env::var("DECISION_WEBHOOK_SECRET").ok();

        let timezone = parse_timezone(
            &env::var("APP_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
        )?;

        let report_cutoff_hour = parse_cutoff_hour(
            &env::var("REPORT_CUTOFF_HOUR").unwrap_or_else(|_| DEFAULT_REPORT_CUTOFF_HOUR.to_string()),
        )?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        Ok(Config {
            database_url,
            environment,
            port,
            db_max_connections,
            log_level,
            jwt_secret,
            auth_service_url,
            notification_queue_url,
            reporting_queue_url,
            decision_webhook_secret,
            timezone,
            report_cutoff_hour,
            cors_allowed_origins,
        })
    }

    /// Get database URL (useful for logging masked version)
    pub fn database_url_masked(&self) -> String {
        // Mask password in database URL for logging
        if let Some(at_pos) = self.database_url.find('@') {
            if let Some(colon_pos) = self.database_url[..at_pos].rfind(':') {
                let prefix = &self.database_url[..colon_pos + 1];
                let suffix = &self.database_url[at_pos..];
                return format!("{}****{}", prefix, suffix);
            }
        }
        self.database_url.clone()
    }
}

impl ConfigProvider for Config {
    fn timezone(&self) -> String {
        self.timezone.name().to_string()
    }

    fn report_cutoff(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.report_cutoff_hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

fn parse_timezone(value: &str) -> Result<Tz, ConfigError> {
    value
        .parse::<Tz>()
        .map_err(|_| ConfigError::InvalidTimezone(value.to_string()))
}

fn parse_cutoff_hour(value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(hour) if hour < 24 => Ok(hour),
        _ => Err(ConfigError::InvalidValue(format!(
            "REPORT_CUTOFF_HOUR must be between 0 and 23, got '{}'",
            value
        ))),
    }
}
