use serde::{Deserialize, Serialize};

pub const BASE_SCORE: i16 = 650;
pub const MIN_SCORE: i16 = 300;
pub const MAX_SCORE: i16 = 850;

// Verified-path resolver.
pub(crate) const APPROVAL_MIN_SCORE: i16 = 580;
pub(crate) const MAX_RISK_FACTORS_FOR_APPROVAL: usize = 3;
pub(crate) const EXCELLENT_SCORE: i16 = 750;
pub(crate) const GOOD_SCORE: i16 = 700;

// Manual-entry path.
pub(crate) const MANUAL_ENTRY_PENALTY: i16 = 50;
pub(crate) const MANUAL_ENTRY_LOAN_CAP: f64 = 5_000.0;
pub(crate) const MANUAL_ENTRY_MIN_SCORE: i16 = 600;

// Capacity estimation, expressed against a 48-month horizon.
pub(crate) const CAPACITY_TERM_MONTHS: f64 = 48.0;
pub(crate) const INCOME_CAPACITY_SHARE: f64 = 0.25;
pub(crate) const BALANCE_CAPACITY_SHARE: f64 = 0.10;
pub(crate) const CAPACITY_OVERRUN_MULTIPLIER: f64 = 1.5;
pub(crate) const MAX_LOAN_TO_REQUEST_MULTIPLIER: f64 = 1.2;

// Income detection over asset-report transactions.
pub(crate) const INCOME_DEPOSIT_MINIMUM: f64 = 1_000.0;
pub(crate) const INCOME_DEPOSIT_COUNT: usize = 2;
pub(crate) const DEBT_TO_INCOME_LIMIT: f64 = 0.3;

/// Immutable lookup tables for the scoring rules and offer pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingTables {
    pub institutions: InstitutionDirectory,
    pub apr: AprSchedule,
}

impl UnderwritingTables {
    pub fn standard() -> Self {
        Self {
            institutions: InstitutionDirectory::standard(),
            apr: AprSchedule::standard(),
        }
    }
}

impl Default for UnderwritingTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// Institutions that earn the trust bonus, matched as case-insensitive substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionDirectory {
    major_banks: Vec<String>,
}

impl InstitutionDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let major_banks = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { major_banks }
    }

    pub fn standard() -> Self {
        Self::new([
            "chase",
            "bank of america",
            "wells fargo",
            "citibank",
            "capital one",
            "u.s. bank",
            "pnc",
            "truist",
            "td bank",
            "usaa",
        ])
    }

    pub fn is_major(&self, institution_name: &str) -> bool {
        let name = institution_name.to_lowercase();
        !name.trim().is_empty() && self.major_banks.iter().any(|bank| name.contains(bank))
    }
}

/// Term menu with its base APRs, plus the score-band adjustments applied on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AprSchedule {
    pub terms: Vec<TermPricing>,
    /// Ordered from the highest `min_score` down; the first matching band wins.
    pub bands: Vec<ScoreBandAdjustment>,
    pub fallback_adjustment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPricing {
    pub term_months: u32,
    pub base_apr: f64,
    pub origination_fee_rate: f64,
    pub down_payment: Option<DownPaymentRule>,
}

/// Down payment required when the score falls below `below_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentRule {
    pub below_score: i16,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBandAdjustment {
    pub min_score: i16,
    pub apr_adjustment: f64,
}

impl AprSchedule {
    pub fn standard() -> Self {
        Self {
            terms: vec![
                TermPricing {
                    term_months: 24,
                    base_apr: 8.9,
                    origination_fee_rate: 0.01,
                    down_payment: None,
                },
                TermPricing {
                    term_months: 48,
                    base_apr: 11.9,
                    origination_fee_rate: 0.005,
                    down_payment: None,
                },
                TermPricing {
                    term_months: 60,
                    base_apr: 13.9,
                    origination_fee_rate: 0.0,
                    down_payment: Some(DownPaymentRule {
                        below_score: 700,
                        rate: 0.10,
                    }),
                },
            ],
            bands: vec![
                ScoreBandAdjustment {
                    min_score: 800,
                    apr_adjustment: -2.0,
                },
                ScoreBandAdjustment {
                    min_score: 750,
                    apr_adjustment: -1.0,
                },
                ScoreBandAdjustment {
                    min_score: 700,
                    apr_adjustment: 0.0,
                },
                ScoreBandAdjustment {
                    min_score: 650,
                    apr_adjustment: 2.0,
                },
            ],
            fallback_adjustment: 4.0,
        }
    }

    pub fn adjustment_for(&self, score: i16) -> f64 {
        self.bands
            .iter()
            .find(|band| score >= band.min_score)
            .map_or(self.fallback_adjustment, |band| band.apr_adjustment)
    }
}

impl Default for AprSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
