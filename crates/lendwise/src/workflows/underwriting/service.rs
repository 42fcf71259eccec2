use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{info, warn};

use super::decisioning::{DecisionEngine, UnderwritingTables, MAX_SCORE, MIN_SCORE};
use super::domain::{DecisionInput, Offer};
use super::offers::OfferGenerator;
use super::repository::{DecisionId, DecisionRecord, DecisionStore, StoreError};
use crate::config::UnderwritingSettings;

/// Caller-side wrapper around the engine: validates input, issues offers for approvals, and
/// hands decisions to the store.
pub struct UnderwritingService<S> {
    engine: Arc<DecisionEngine>,
    offers: Arc<OfferGenerator>,
    store: Arc<S>,
    settings: UnderwritingSettings,
}

static DECISION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_decision_id() -> DecisionId {
    let id = DECISION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DecisionId(format!("dec-{id:06}"))
}

impl<S> UnderwritingService<S>
where
    S: DecisionStore + 'static,
{
    pub fn new(store: Arc<S>, tables: UnderwritingTables) -> Self {
        Self::with_settings(store, tables, UnderwritingSettings::default())
    }

    pub fn with_settings(
        store: Arc<S>,
        tables: UnderwritingTables,
        settings: UnderwritingSettings,
    ) -> Self {
        let UnderwritingTables { institutions, apr } = tables;

        Self {
            engine: Arc::new(DecisionEngine::new(institutions)),
            offers: Arc::new(OfferGenerator::new(apr)),
            store,
            settings,
        }
    }

    /// Run the engine for a validated request and record the outcome.
    pub fn decide(&self, input: DecisionInput) -> Result<DecisionRecord, UnderwritingServiceError> {
        validate_loan_amount(input.loan_amount)?;

        let result = self.engine.decide(&input);
        let offers = self
            .offers
            .generate(input.loan_amount, result.score, result.approved);

        let record = DecisionRecord {
            decision_id: next_decision_id(),
            loan_amount: input.loan_amount,
            customer: input.customer_info,
            result,
            offers,
            decided_at: Utc::now(),
        };

        info!(
            decision_id = %record.decision_id,
            policy = record.result.policy.label(),
            score = record.result.score,
            approved = record.result.approved,
            offers = record.offers.len(),
            "underwriting decision made"
        );

        if !self.settings.record_decisions {
            return Ok(record);
        }

        match self.store.insert(record) {
            Ok(stored) => Ok(stored),
            Err(err) => {
                warn!(error = %err, "failed to record underwriting decision");
                Err(err.into())
            }
        }
    }

    /// Price the offer menu for a score that was already decided.
    pub fn offers(
        &self,
        loan_amount: f64,
        score: i16,
        approved: bool,
    ) -> Result<Vec<Offer>, UnderwritingServiceError> {
        validate_loan_amount(loan_amount)?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(UnderwritingServiceError::InvalidScore(score));
        }

        Ok(self.offers.generate(loan_amount, score, approved))
    }

    /// Fetch a recorded decision.
    pub fn get(&self, decision_id: &DecisionId) -> Result<DecisionRecord, UnderwritingServiceError> {
        let record = self
            .store
            .fetch(decision_id)?
            .ok_or(StoreError::NotFound)?;
        Ok(record)
    }
}

fn validate_loan_amount(loan_amount: f64) -> Result<(), UnderwritingServiceError> {
    if loan_amount.is_finite() && loan_amount > 0.0 {
        Ok(())
    } else {
        Err(UnderwritingServiceError::InvalidLoanAmount(loan_amount))
    }
}

/// Error raised by the underwriting service.
#[derive(Debug, thiserror::Error)]
pub enum UnderwritingServiceError {
    #[error("loan amount must be a positive, finite value (found {0})")]
    InvalidLoanAmount(f64),
    #[error("score must fall within 300..=850 (found {0})")]
    InvalidScore(i16),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UnderwritingServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UnderwritingServiceError::InvalidLoanAmount(_)
            | UnderwritingServiceError::InvalidScore(_) => StatusCode::UNPROCESSABLE_ENTITY,
            UnderwritingServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
            UnderwritingServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            UnderwritingServiceError::Store(StoreError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
