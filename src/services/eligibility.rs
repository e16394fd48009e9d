//! Requested-amount eligibility rules

use rust_decimal::Decimal;
use thiserror::Error;

use crate::application::LoanType;

/// Requested amount violates the loan type's bounds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidAmount(pub String);

/// Check `amount` against the loan type's inclusive `[min_amount, max_amount]` range.
///
/// Returns the validated amount so callers don't need to unwrap it again.
pub fn validate(amount: Option<Decimal>, loan_type: &LoanType) -> Result<Decimal, InvalidAmount> {
    let amount = amount.ok_or_else(|| InvalidAmount("Amount cannot be null".to_string()))?;

    if amount < loan_type.min_amount || amount > loan_type.max_amount {
        return Err(InvalidAmount(format!(
            "Amount {} is outside the allowed range [{}, {}] for loan type {}",
            amount, loan_type.min_amount, loan_type.max_amount, loan_type.name
        )));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn personal_loan() -> LoanType {
        LoanType {
            id: Uuid::new_v4(),
            name: "Personal".to_string(),
            min_amount: dec!(1000),
            max_amount: dec!(50000),
            interest_rate: dec!(12.5),
            automatic_validation: true,
        }
    }

    #[test]
    fn test_missing_amount() {
        let err = validate(None, &personal_loan()).unwrap_err();
        assert_eq!(err.to_string(), "Amount cannot be null");
    }

    #[test]
    fn test_amount_below_minimum() {
        let err = validate(Some(dec!(999.99)), &personal_loan()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("999.99"));
        assert!(message.contains("1000"));
        assert!(message.contains("50000"));
        assert!(message.contains("Personal"));
    }

    #[test]
    fn test_amount_above_maximum() {
        let err = validate(Some(dec!(50000.01)), &personal_loan()).unwrap_err();
        assert!(err.to_string().contains("Personal"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let loan_type = personal_loan();
        assert_eq!(validate(Some(dec!(1000)), &loan_type), Ok(dec!(1000)));
        assert_eq!(validate(Some(dec!(50000)), &loan_type), Ok(dec!(50000)));
        assert_eq!(validate(Some(dec!(20000)), &loan_type), Ok(dec!(20000)));
    }
}
