use super::super::domain::round_to_hundredths;
use super::config::{
    BALANCE_CAPACITY_SHARE, CAPACITY_OVERRUN_MULTIPLIER, CAPACITY_TERM_MONTHS,
    INCOME_CAPACITY_SHARE, MAX_LOAN_TO_REQUEST_MULTIPLIER,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacitySource {
    DetectedIncome,
    AvailableBalance,
}

/// Estimated repayment capacity for a verified applicant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityEstimate {
    pub source: CapacitySource,
    pub monthly_capacity: f64,
    /// What the applicant could service over the capacity horizon.
    pub capacity_ceiling: f64,
    /// Never more than 120% of the requested amount.
    pub max_loan_amount: f64,
    /// The request exceeds 150% of the ceiling.
    pub overrun: bool,
}

pub fn estimate(loan_amount: f64, available_balance: f64, income: Option<f64>) -> CapacityEstimate {
    let (source, monthly_capacity) = match income.filter(|amount| *amount > 0.0) {
        Some(amount) => (CapacitySource::DetectedIncome, amount * INCOME_CAPACITY_SHARE),
        None => (
            CapacitySource::AvailableBalance,
            available_balance * BALANCE_CAPACITY_SHARE,
        ),
    };

    let capacity_ceiling = monthly_capacity * CAPACITY_TERM_MONTHS;
    let overrun = loan_amount > capacity_ceiling * CAPACITY_OVERRUN_MULTIPLIER;
    let max_loan_amount = (loan_amount * MAX_LOAN_TO_REQUEST_MULTIPLIER)
        .min(capacity_ceiling)
        .max(0.0);

    CapacityEstimate {
        source,
        monthly_capacity,
        capacity_ceiling,
        max_loan_amount: round_to_hundredths(max_loan_amount),
        overrun,
    }
}
