use super::super::domain::{DataUsed, DecisionPath, DecisionResult, Signal};
use super::super::normalizer::NormalizedSnapshot;
use super::capacity;
use super::config::{
    InstitutionDirectory, APPROVAL_MIN_SCORE, BASE_SCORE, EXCELLENT_SCORE, GOOD_SCORE,
    MANUAL_ENTRY_LOAN_CAP, MANUAL_ENTRY_MIN_SCORE, MANUAL_ENTRY_PENALTY,
    MAX_RISK_FACTORS_FOR_APPROVAL,
};
use super::rules::{self, ScoreCard};

/// A complete decision path, from normalized snapshot to result.
pub trait DecisionPolicy: Send + Sync {
    fn path(&self) -> DecisionPath;

    fn evaluate(&self, loan_amount: f64, snapshot: &NormalizedSnapshot) -> DecisionResult;
}

/// Reason behind a decision, rendered into `DecisionResult::decision_reason`.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionReason {
    ExcellentProfile,
    GoodProfile,
    StandardTerms,
    Declined { risk_factors: Vec<String> },
    ManualEntryApproved { verification_status: Option<String> },
    ManualEntryLimitExceeded { cap: f64 },
    ManualEntryDeclined,
}

impl DecisionReason {
    pub fn is_approval(&self) -> bool {
        matches!(
            self,
            DecisionReason::ExcellentProfile
                | DecisionReason::GoodProfile
                | DecisionReason::StandardTerms
                | DecisionReason::ManualEntryApproved { .. }
        )
    }

    pub fn summary(&self) -> String {
        match self {
            DecisionReason::ExcellentProfile => {
                "Approved: excellent financial profile".to_string()
            }
            DecisionReason::GoodProfile => "Approved: good financial profile".to_string(),
            DecisionReason::StandardTerms => "Approved with standard terms".to_string(),
            DecisionReason::Declined { risk_factors } => {
                if risk_factors.is_empty() {
                    "Declined: score below approval threshold".to_string()
                } else {
                    format!("Declined: {}", risk_factors.join("; "))
                }
            }
            DecisionReason::ManualEntryApproved {
                verification_status,
            } => match verification_status {
                Some(status) => format!(
                    "Approved based on manually entered bank details (verification status: {status})"
                ),
                None => "Approved based on manually entered bank details".to_string(),
            },
            DecisionReason::ManualEntryLimitExceeded { cap } => format!(
                "Declined: manually entered bank accounts are limited to loans of ${cap:.0}; link your bank to request more"
            ),
            DecisionReason::ManualEntryDeclined => {
                "Declined: manually entered bank details do not meet approval requirements"
                    .to_string()
            }
        }
    }
}

/// Provider-verified snapshots: full rule set, capacity check, score thresholds.
#[derive(Debug, Clone)]
pub struct VerifiedAccountPolicy {
    institutions: InstitutionDirectory,
}

impl VerifiedAccountPolicy {
    pub fn new(institutions: InstitutionDirectory) -> Self {
        Self { institutions }
    }
}

impl DecisionPolicy for VerifiedAccountPolicy {
    fn path(&self) -> DecisionPath {
        DecisionPath::Verified
    }

    fn evaluate(&self, loan_amount: f64, snapshot: &NormalizedSnapshot) -> DecisionResult {
        let mut card = ScoreCard::new(BASE_SCORE);
        let signals = rules::score_verified(&mut card, loan_amount, snapshot, &self.institutions);

        let capacity = capacity::estimate(loan_amount, snapshot.available_balance, signals.income());
        if capacity.overrun {
            card.risk(
                Signal::RepaymentCapacity,
                -30,
                format!(
                    "Loan amount may exceed repayment capacity (estimated ${:.2} per month)",
                    capacity.monthly_capacity
                ),
            );
        }

        let reason = resolve_verified(&card);
        card.into_result(
            reason.is_approval(),
            capacity.max_loan_amount,
            reason.summary(),
            signals.data_used(snapshot),
            DecisionPath::Verified,
        )
    }
}

pub(crate) fn resolve_verified(card: &ScoreCard) -> DecisionReason {
    let score = card.score();
    let approved = score >= APPROVAL_MIN_SCORE && card.risk_count() <= MAX_RISK_FACTORS_FOR_APPROVAL;

    if !approved {
        return DecisionReason::Declined {
            risk_factors: card.risk_labels().take(2).map(str::to_string).collect(),
        };
    }

    if score >= EXCELLENT_SCORE {
        DecisionReason::ExcellentProfile
    } else if score >= GOOD_SCORE {
        DecisionReason::GoodProfile
    } else {
        DecisionReason::StandardTerms
    }
}

/// Applicant-typed bank details without provider verification.
///
/// Starts 50 points below the verified base, which lands exactly on the 600 approval floor.
/// Any extra penalty added to this path pushes every manual applicant below it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualEntryPolicy;

impl DecisionPolicy for ManualEntryPolicy {
    fn path(&self) -> DecisionPath {
        DecisionPath::ManualEntry
    }

    fn evaluate(&self, loan_amount: f64, snapshot: &NormalizedSnapshot) -> DecisionResult {
        let mut card = ScoreCard::new(BASE_SCORE);
        card.risk(
            Signal::UnverifiedAccount,
            -MANUAL_ENTRY_PENALTY,
            "Unverified bank account (manual entry)",
        );

        let exceeds_cap = loan_amount > MANUAL_ENTRY_LOAN_CAP;
        if exceeds_cap {
            card.risk(
                Signal::ManualEntryLimit,
                0,
                format!(
                    "Loan amount exceeds manual-entry threshold of ${MANUAL_ENTRY_LOAN_CAP:.0}"
                ),
            );
        }

        if snapshot.has_ach {
            card.positive(Signal::AchDetails, 0, "ACH details provided for disbursement");
        }

        let approved = card.score() >= MANUAL_ENTRY_MIN_SCORE && !exceeds_cap;
        let reason = if approved {
            DecisionReason::ManualEntryApproved {
                verification_status: snapshot.verification_status.clone(),
            }
        } else if exceeds_cap {
            DecisionReason::ManualEntryLimitExceeded {
                cap: MANUAL_ENTRY_LOAN_CAP,
            }
        } else {
            DecisionReason::ManualEntryDeclined
        };

        let max_loan_amount = loan_amount.min(MANUAL_ENTRY_LOAN_CAP).max(0.0);

        card.into_result(
            approved,
            max_loan_amount,
            reason.summary(),
            DataUsed::default(),
            DecisionPath::ManualEntry,
        )
    }
}
