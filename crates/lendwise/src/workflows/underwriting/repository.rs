use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CustomerInfo, DecisionResult, Offer};

/// Identifier assigned to each underwriting decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub String);

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decision as handed to persistence: the result plus the offers issued with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub decision_id: DecisionId,
    pub loan_amount: f64,
    pub customer: CustomerInfo,
    pub result: DecisionResult,
    pub offers: Vec<Offer>,
    pub decided_at: DateTime<Utc>,
}

impl DecisionRecord {
    pub fn view(&self) -> DecisionView {
        DecisionView {
            decision_id: self.decision_id.clone(),
            loan_amount: self.loan_amount,
            decision: self.result.clone(),
            offers: self.offers.clone(),
        }
    }
}

/// Storage abstraction for the persistence collaborator.
pub trait DecisionStore: Send + Sync {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError>;
    fn fetch(&self, id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("decision already recorded")]
    Conflict,
    #[error("decision not found")]
    NotFound,
    #[error("decision store unavailable: {0}")]
    Unavailable(String),
}

/// Client-facing view of a decision. Customer details stay out of responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionView {
    pub decision_id: DecisionId,
    pub loan_amount: f64,
    pub decision: DecisionResult,
    pub offers: Vec<Offer>,
}
