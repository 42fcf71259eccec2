use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::UnderwritingSettings;
use crate::workflows::underwriting::domain::{
    AccountBalance, AccountSnapshot, AchNumbers, AssetReport, AssetReportData, AssetReportStatus,
    CustomerInfo, DecisionInput, HistoricalBalance, LinkedAccount, ReportTransaction,
};
use crate::workflows::underwriting::repository::{
    DecisionId, DecisionRecord, DecisionStore, StoreError,
};
use crate::workflows::underwriting::{UnderwritingService, UnderwritingTables};

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn customer() -> CustomerInfo {
    CustomerInfo {
        first_name: "Dana".to_string(),
        last_name: "Okafor".to_string(),
        email: "dana.okafor@example.com".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 12).expect("valid"),
    }
}

/// Verified checking account at an institution outside the major-bank list.
pub(super) fn verified_snapshot(available: f64) -> AccountSnapshot {
    AccountSnapshot {
        institution_name: "Prairie Federal Credit Union".to_string(),
        account_mask: "4417".to_string(),
        account_type: "checking".to_string(),
        balance: Some(AccountBalance {
            current: Some(available),
            available: Some(available),
            limit: None,
        }),
        ach_numbers: None,
        all_accounts: None,
        asset_report: None,
        manual_entry: false,
        verification_status: None,
    }
}

pub(super) fn manual_snapshot() -> AccountSnapshot {
    AccountSnapshot {
        institution_name: "Prairie Federal Credit Union".to_string(),
        account_mask: "9921".to_string(),
        account_type: "checking".to_string(),
        balance: None,
        ach_numbers: Some(ach_numbers()),
        all_accounts: None,
        asset_report: None,
        manual_entry: true,
        verification_status: Some("pending_manual_verification".to_string()),
    }
}

pub(super) fn ach_numbers() -> AchNumbers {
    AchNumbers {
        routing: "021000021".to_string(),
        account: "000123456789".to_string(),
    }
}

pub(super) fn linked(available: f64) -> LinkedAccount {
    LinkedAccount {
        account_id: None,
        name: Some("Linked account".to_string()),
        balance: Some(AccountBalance {
            current: Some(available),
            available: Some(available),
            limit: None,
        }),
    }
}

pub(super) fn ready_report(
    days_available: Option<u32>,
    balances: &[f64],
    deposits: &[f64],
) -> AssetReport {
    AssetReport {
        status: Some(AssetReportStatus::Ready),
        report: Some(AssetReportData {
            days_available,
            historical_balances: balances
                .iter()
                .enumerate()
                .map(|(index, current)| HistoricalBalance {
                    date: date(3, 1 + index as u32),
                    current: *current,
                })
                .collect(),
            transactions: deposits
                .iter()
                .enumerate()
                .map(|(index, amount)| ReportTransaction {
                    amount: *amount,
                    date: date(4, 1 + index as u32),
                    name: Some("Payroll".to_string()),
                })
                .collect(),
        }),
    }
}

pub(super) fn input(loan_amount: f64, account_snapshot: AccountSnapshot) -> DecisionInput {
    DecisionInput {
        loan_amount,
        account_snapshot,
        customer_info: customer(),
    }
}

pub(super) fn build_service() -> (UnderwritingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = UnderwritingService::new(store.clone(), UnderwritingTables::standard());
    (service, store)
}

pub(super) fn unrecorded_service() -> (UnderwritingService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = UnderwritingService::with_settings(
        store.clone(),
        UnderwritingTables::standard(),
        UnderwritingSettings {
            record_decisions: false,
        },
    );
    (service, store)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<HashMap<DecisionId, DecisionRecord>>>,
}

impl MemoryStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl DecisionStore for MemoryStore {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.decision_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.decision_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct ConflictStore;

impl DecisionStore for ConflictStore {
    fn insert(&self, _record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        Err(StoreError::Conflict)
    }

    fn fetch(&self, _id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError> {
        Ok(None)
    }
}

pub(super) struct UnavailableStore;

impl DecisionStore for UnavailableStore {
    fn insert(&self, _record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
