use crate::types::{round2, LoanOption};

pub const LOAN_TENURES_MONTHS: [u32; 5] = [12, 24, 36, 48, 60];
pub const DOWN_PAYMENT_FRACTION: f64 = 0.20;

/// Fixed-rate amortizing payment. A zero rate spreads the principal evenly.
pub fn monthly_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if principal <= 0.0 || months == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / f64::from(months);
    }
    let growth = (1.0 + monthly_rate).powf(f64::from(months));
    principal * monthly_rate * growth / (growth - 1.0)
}

/// One option per fixed tenure. A net cost at or below zero leaves nothing
/// to finance, so every amount in that case is zero.
pub fn loan_options(net_cost: f64, annual_rate: f64) -> Vec<LoanOption> {
    let financed_cost = net_cost.max(0.0);
    let down_payment = financed_cost * DOWN_PAYMENT_FRACTION;
    let principal = financed_cost - down_payment;
    let monthly_rate = annual_rate / 12.0;

    LOAN_TENURES_MONTHS
        .iter()
        .map(|&months| {
            let emi = monthly_payment(principal, monthly_rate, months);
            let total_payment = emi * f64::from(months);
            let total_interest = (total_payment - principal).max(0.0);
            LoanOption {
                tenure_months: months,
                annual_interest_rate: annual_rate,
                down_payment: round2(down_payment),
                principal: round2(principal),
                monthly_payment: round2(emi),
                total_payment: round2(total_payment),
                total_interest: round2(total_interest),
            }
        })
        .collect()
}
