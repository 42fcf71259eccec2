use super::domain::{AccountBalance, AccountSnapshot, AssetReportData, AssetReportStatus};

/// Working copy of an [`AccountSnapshot`] with every field the rules read resolved to a
/// concrete value.
///
/// Manual-entry snapshots never carry provider-verified data: balances, linked accounts, and
/// the asset report are dropped even when the caller populated them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSnapshot {
    pub institution_name: String,
    pub account_mask: String,
    pub manual_entry: bool,
    pub verification_status: Option<String>,
    pub has_balance: bool,
    pub available_balance: f64,
    pub linked_balances: Vec<f64>,
    pub has_ach: bool,
    pub asset_report_ready: bool,
    pub asset_report: Option<AssetReportData>,
}

impl NormalizedSnapshot {
    pub fn from_snapshot(snapshot: &AccountSnapshot) -> Self {
        let manual_entry = snapshot.manual_entry;
        let has_ach = snapshot.ach_numbers.as_ref().is_some_and(|ach| {
            !ach.routing.trim().is_empty() && !ach.account.trim().is_empty()
        });

        if manual_entry {
            return Self {
                institution_name: snapshot.institution_name.trim().to_string(),
                account_mask: snapshot.account_mask.clone(),
                manual_entry,
                verification_status: snapshot.verification_status.clone(),
                has_balance: false,
                available_balance: 0.0,
                linked_balances: Vec::new(),
                has_ach,
                asset_report_ready: false,
                asset_report: None,
            };
        }

        let balance = snapshot.balance.as_ref();
        let linked_balances = snapshot
            .all_accounts
            .iter()
            .flatten()
            .map(|account| account.balance.as_ref().map_or(0.0, spendable_balance))
            .collect();

        let asset_report_ready = snapshot
            .asset_report
            .as_ref()
            .is_some_and(|report| report.status == Some(AssetReportStatus::Ready));
        let asset_report = if asset_report_ready {
            snapshot
                .asset_report
                .as_ref()
                .and_then(|report| report.report.clone())
        } else {
            None
        };

        Self {
            institution_name: snapshot.institution_name.trim().to_string(),
            account_mask: snapshot.account_mask.clone(),
            manual_entry,
            verification_status: None,
            has_balance: balance.is_some(),
            available_balance: balance.map_or(0.0, spendable_balance),
            linked_balances,
            has_ach,
            asset_report_ready,
            asset_report,
        }
    }

    pub fn linked_total(&self) -> f64 {
        self.linked_balances.iter().sum()
    }
}

/// Available funds, falling back to the current balance, then to zero.
fn spendable_balance(balance: &AccountBalance) -> f64 {
    balance
        .available
        .filter(|value| value.is_finite())
        .or(balance.current.filter(|value| value.is_finite()))
        .unwrap_or(0.0)
}
