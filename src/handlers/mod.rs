//! API handlers for LendFlow

pub mod applications;
pub mod decisions;
pub mod reports;

pub use applications::{list_applications, register_application, update_application_status};
pub use decisions::receive_decision;
pub use reports::get_daily_report;
