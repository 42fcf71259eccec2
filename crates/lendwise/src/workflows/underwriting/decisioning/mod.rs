pub mod asset_report;
pub mod capacity;
mod config;
mod policy;
mod rules;

pub use config::{
    AprSchedule, DownPaymentRule, InstitutionDirectory, ScoreBandAdjustment, TermPricing,
    UnderwritingTables, BASE_SCORE, MAX_SCORE, MIN_SCORE,
};
pub use policy::{DecisionPolicy, DecisionReason, ManualEntryPolicy, VerifiedAccountPolicy};

use super::domain::{DecisionInput, DecisionResult};
use super::normalizer::NormalizedSnapshot;
use tracing::debug;

/// Stateless decision engine. Selects the decision policy for a snapshot and runs it.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    verified: VerifiedAccountPolicy,
    manual: ManualEntryPolicy,
}

impl DecisionEngine {
    pub fn new(institutions: InstitutionDirectory) -> Self {
        Self {
            verified: VerifiedAccountPolicy::new(institutions),
            manual: ManualEntryPolicy,
        }
    }

    pub fn standard() -> Self {
        Self::new(InstitutionDirectory::standard())
    }

    /// Manual-entry snapshots never reach the verified rules.
    pub fn policy_for(&self, snapshot: &NormalizedSnapshot) -> &dyn DecisionPolicy {
        if snapshot.manual_entry {
            &self.manual
        } else {
            &self.verified
        }
    }

    pub fn decide(&self, input: &DecisionInput) -> DecisionResult {
        let snapshot = NormalizedSnapshot::from_snapshot(&input.account_snapshot);
        let policy = self.policy_for(&snapshot);
        let result = policy.evaluate(input.loan_amount, &snapshot);

        debug!(
            policy = policy.path().label(),
            account_mask = %snapshot.account_mask,
            score = result.score,
            approved = result.approved,
            risk_factors = result.risk_factors.len(),
            "underwriting decision computed"
        );

        result
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::standard()
    }
}
