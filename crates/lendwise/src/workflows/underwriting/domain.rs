use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bank-account snapshot supplied by the bank-data provider or the manual-entry form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    #[serde(default)]
    pub institution_name: String,
    #[serde(default)]
    pub account_mask: String,
    #[serde(default)]
    pub account_type: String,
    pub balance: Option<AccountBalance>,
    pub ach_numbers: Option<AchNumbers>,
    pub all_accounts: Option<Vec<LinkedAccount>>,
    pub asset_report: Option<AssetReport>,
    #[serde(default)]
    pub manual_entry: bool,
    /// Only meaningful when `manual_entry` is set.
    pub verification_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub current: Option<f64>,
    pub available: Option<f64>,
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchNumbers {
    pub routing: String,
    pub account: String,
}

/// Sibling account at the same institution, reported alongside the primary account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub account_id: Option<String>,
    pub name: Option<String>,
    pub balance: Option<AccountBalance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetReportStatus {
    Ready,
    Pending,
    /// Any other provider status, such as `failed`.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReport {
    /// Absent or null when the provider has not reported a status yet.
    #[serde(default)]
    pub status: Option<AssetReportStatus>,
    pub report: Option<AssetReportData>,
}

/// Provider-furnished history for the primary account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReportData {
    pub days_available: Option<u32>,
    #[serde(default)]
    pub historical_balances: Vec<HistoricalBalance>,
    #[serde(default)]
    pub transactions: Vec<ReportTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBalance {
    pub date: NaiveDate,
    pub current: f64,
}

/// Provider convention: a negative amount is money flowing into the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTransaction {
    pub amount: f64,
    pub date: NaiveDate,
    pub name: Option<String>,
}

impl ReportTransaction {
    pub fn is_inbound(&self) -> bool {
        self.amount < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// Request handed to the engine. `loan_amount` is validated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionInput {
    pub loan_amount: f64,
    pub account_snapshot: AccountSnapshot,
    pub customer_info: CustomerInfo,
}

/// Which decision policy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    Verified,
    ManualEntry,
}

impl DecisionPath {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionPath::Verified => "verified",
            DecisionPath::ManualEntry => "manual_entry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Positive,
    Risk,
}

/// Rule that contributed a factor to the decision trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    ReserveRatio,
    AbsoluteBalance,
    MultiAccount,
    AverageBalance,
    BalanceStability,
    IncomeDetection,
    DebtToIncome,
    AccountAge,
    InstitutionTrust,
    AchDetails,
    RepaymentCapacity,
    UnverifiedAccount,
    ManualEntryLimit,
}

/// Discrete, explicitly tagged contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactor {
    pub kind: FactorKind,
    pub signal: Signal,
    pub delta: i16,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUsed {
    pub has_balance: bool,
    pub has_asset_report: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_detected: Option<f64>,
}

/// Outcome of a single underwriting decision.
///
/// `risk_factors` and `positive_factors` carry the labels in the order the rules fired;
/// `factors` carries the same entries tagged with their kind, rule, and score delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    pub approved: bool,
    pub score: i16,
    pub max_loan_amount: f64,
    pub risk_factors: Vec<String>,
    pub positive_factors: Vec<String>,
    pub factors: Vec<ScoreFactor>,
    pub decision_reason: String,
    pub data_used: DataUsed,
    pub policy: DecisionPath,
}

/// Amortized installment offer for one term length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub term_months: u32,
    pub apr: f64,
    pub monthly_payment: f64,
    pub down_payment: f64,
    pub origination_fee: f64,
    pub total_amount: f64,
}

/// Rounds to two decimal places (cents, or hundredths of a percent for APRs).
pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round_whole(value: f64) -> f64 {
    value.round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_tolerates_sparse_provider_payloads() {
        let snapshot: AccountSnapshot = serde_json::from_value(json!({
            "institutionName": "Chase",
            "balance": { "available": 250.5 },
            "assetReport": { "status": "pending" }
        }))
        .expect("sparse snapshot parses");

        assert_eq!(snapshot.institution_name, "Chase");
        assert!(snapshot.account_mask.is_empty());
        assert_eq!(
            snapshot.balance.as_ref().and_then(|balance| balance.available),
            Some(250.5)
        );
        assert!(snapshot.all_accounts.is_none());
        assert!(!snapshot.manual_entry);
        assert_eq!(
            snapshot.asset_report.and_then(|report| report.status),
            Some(AssetReportStatus::Pending)
        );
    }

    #[test]
    fn unrecognized_or_missing_report_statuses_still_parse() {
        for (report, expected) in [
            (json!({ "status": "failed" }), Some(AssetReportStatus::Unknown)),
            (json!({ "status": null }), None),
            (json!({}), None),
        ] {
            let snapshot: AccountSnapshot =
                serde_json::from_value(json!({ "assetReport": report.clone() }))
                    .unwrap_or_else(|err| panic!("{report} should parse: {err}"));

            assert_eq!(
                snapshot.asset_report.and_then(|report| report.status),
                expected
            );
        }
    }

    #[test]
    fn data_used_omits_unknown_measurements() {
        let value = serde_json::to_value(DataUsed {
            has_balance: true,
            ..DataUsed::default()
        })
        .expect("serializes");

        assert_eq!(value, json!({ "hasBalance": true, "hasAssetReport": false }));
    }

    #[test]
    fn rounding_helpers_target_cents_and_whole_units() {
        assert_eq!(round_to_hundredths(8.9 - 1.0), 7.9);
        assert_eq!(round_to_hundredths(452.4049), 452.4);
        assert_eq!(round_whole(1234.5), 1235.0);
    }
}
