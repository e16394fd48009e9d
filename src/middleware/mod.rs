//! Middleware for LendFlow API
//!
//! This module provides middleware for request tracing and authentication.

pub mod auth;
mod tracing;

pub use auth::{AdminUser, AdvisorUser, AuthenticatedUser, ClientUser};
pub use self::tracing::{request_tracing, REQUEST_ID_HEADER};
