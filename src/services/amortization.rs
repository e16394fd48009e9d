//! Amortization schedule computation
//!
//! Level-payment (French) amortization with every monetary figure rounded
//! half-up to cents. The last month absorbs rounding drift so the schedule
//! always closes at a zero balance.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::application::PaymentPlanEntry;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Round half-up to cents
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Monthly rate as a fraction from an annual percentage rate
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT
}

/// Unrounded level monthly payment `P·r / (1 − (1+r)^−n)`.
///
/// Non-positive rates or terms fall back to `principal / max(term, 1)`. When
/// `(1+r)^n` exceeds `Decimal`, the discount term is zero and the payment is `P·r`.
pub fn level_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: i32,
) -> Decimal {
    if annual_rate_percent <= Decimal::ZERO || term_months <= 0 {
        return principal / Decimal::from(term_months.max(1));
    }

    let rate = monthly_rate(annual_rate_percent);
    let discount = (Decimal::ONE + rate)
        .checked_powu(term_months as u64)
        .map_or(Decimal::ZERO, |growth| Decimal::ONE / growth);
    principal * rate / (Decimal::ONE - discount)
}

/// Build the month-by-month payment plan.
///
/// Returns exactly `term_months` entries; a zero term yields an empty plan.
pub fn generate(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> Vec<PaymentPlanEntry> {
    if term_months == 0 {
        return Vec::new();
    }

    if annual_rate_percent <= Decimal::ZERO {
        return flat_schedule(principal, term_months);
    }

    let rate = monthly_rate(annual_rate_percent);
    let payment = round_money(level_payment(principal, annual_rate_percent, term_months as i32));

    let mut plan = Vec::with_capacity(term_months as usize);
    let mut balance = round_money(principal);

    for month in 1..=term_months {
        let interest = round_money(balance * rate);

        if month == term_months {
            plan.push(PaymentPlanEntry {
                month,
                payment: balance + interest,
                principal: balance,
                interest,
                balance: Decimal::ZERO,
            });
            break;
        }

        let principal_portion = payment - interest;
        balance -= principal_portion;

        plan.push(PaymentPlanEntry {
            month,
            payment,
            principal: principal_portion,
            interest,
            balance,
        });
    }

    plan
}

// Zero and negative rates amortize the principal evenly with no interest.
fn flat_schedule(principal: Decimal, term_months: u32) -> Vec<PaymentPlanEntry> {
    let installment = round_money(principal / Decimal::from(term_months));
    let mut balance = round_money(principal);

    (1..=term_months)
        .map(|month| {
            let principal_portion = if month == term_months {
                balance
            } else {
                installment
            };
            balance -= principal_portion;

            PaymentPlanEntry {
                month,
                payment: principal_portion,
                principal: principal_portion,
                interest: Decimal::ZERO,
                balance,
            }
        })
        .collect()
}
