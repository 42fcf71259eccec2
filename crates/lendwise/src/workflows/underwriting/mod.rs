//! Underwriting decisioning: turns a requested amount and a bank-account snapshot into a risk
//! score, an approve/decline verdict, a maximum loan amount, and an installment offer menu.
//!
//! The pipeline is normalizer, then policy selection (manual entry or verified), then scoring,
//! capacity estimation, and resolution inside the selected policy. Offers are priced separately
//! and only for approved decisions. Every stage is a pure function of its input.

pub mod decisioning;
pub mod domain;
pub mod normalizer;
pub mod offers;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use decisioning::{
    AprSchedule, DecisionEngine, DecisionPolicy, DecisionReason, InstitutionDirectory,
    ManualEntryPolicy, UnderwritingTables, VerifiedAccountPolicy,
};
pub use domain::{
    AccountBalance, AccountSnapshot, AchNumbers, AssetReport, AssetReportData, AssetReportStatus,
    CustomerInfo, DataUsed, DecisionInput, DecisionPath, DecisionResult, FactorKind,
    HistoricalBalance, LinkedAccount, Offer, ReportTransaction, ScoreFactor, Signal,
};
pub use normalizer::NormalizedSnapshot;
pub use offers::{amortized_payment, OfferGenerator};
pub use repository::{DecisionId, DecisionRecord, DecisionStore, DecisionView, StoreError};
pub use router::{underwriting_router, OfferMenu, OfferRequest};
pub use service::{UnderwritingService, UnderwritingServiceError};

/// Decide a request against the standard rule tables.
pub fn decide(input: &DecisionInput) -> DecisionResult {
    DecisionEngine::standard().decide(input)
}

/// Price the standard offer menu. Returns nothing unless `approved`.
pub fn generate_offers(loan_amount: f64, score: i16, approved: bool) -> Vec<Offer> {
    OfferGenerator::standard().generate(loan_amount, score, approved)
}
