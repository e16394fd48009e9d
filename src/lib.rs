//! LendFlow Backend Library
//!
//! Loan application intake, credit decision processing and advisor
//! portfolio views for the LendFlow lending platform.

pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateways;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod state;
