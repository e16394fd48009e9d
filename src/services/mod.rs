//! Pure loan computations shared by the workflows

pub mod amortization;
pub mod eligibility;

pub use eligibility::InvalidAmount;
