//! Authentication middleware
//!
//! Extractors for JWT token verification and role checks.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{verify_token, AuthSettings, JwtError, Role};

/// Authenticated user extracted from JWT token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Raw bearer token, forwarded to the auth service
    pub token: String,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    #[serde(skip)]
    status: StatusCode,
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    fn unauthorized(code: &str, message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Extractor for authenticated users
///
/// Verifies the JWT from the Authorization header.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(user: AuthenticatedUser) -> impl IntoResponse {
///     format!("Hello, user {}", user.user_id)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::unauthorized(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response()
                })?;

        let settings = Arc::<AuthSettings>::from_ref(state);

        let claims = verify_token(bearer.token(), settings.jwt_secret()).map_err(|e| {
            let (code, message) = match e {
                JwtError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired"),
                _ => ("INVALID_TOKEN", "Invalid token"),
            };
            AuthError::unauthorized(code, message).into_response()
        })?;

        let user_id = claims.user_id().map_err(|_| {
            AuthError::unauthorized("INVALID_TOKEN", "Invalid user ID in token").into_response()
        })?;

        let role = claims.role().map_err(|_| {
            AuthError::unauthorized("INVALID_TOKEN", "Invalid role in token").into_response()
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
            role,
            token: bearer.token().to_string(),
        })
    }
}

async fn require_role<S>(
    parts: &mut Parts,
    state: &S,
    allowed: &[Role],
    message: &str,
) -> Result<AuthenticatedUser, Response>
where
    Arc<AuthSettings>: FromRef<S>,
    S: Send + Sync,
{
    let user = AuthenticatedUser::from_request_parts(parts, state).await?;

    if !allowed.contains(&user.role) {
        return Err(AuthError::new(StatusCode::FORBIDDEN, "FORBIDDEN", message).into_response());
    }

    Ok(user)
}

/// Applicant submitting their own applications
pub struct ClientUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for ClientUser
where
    Arc<AuthSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[Role::Client], "Client access required")
            .await
            .map(ClientUser)
    }
}

/// Advisor (or admin) reviewing applications
pub struct AdvisorUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdvisorUser
where
    Arc<AuthSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(
            parts,
            state,
            &[Role::Advisor, Role::Admin],
            "Advisor access required",
        )
        .await
        .map(AdvisorUser)
    }
}

pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[Role::Admin], "Admin access required")
            .await
            .map(AdminUser)
    }
}
