use lendwise::workflows::underwriting::{DecisionId, DecisionRecord, DecisionStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local decision store used by the service and the CLI.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDecisionStore {
    records: Arc<Mutex<HashMap<DecisionId, DecisionRecord>>>,
}

impl InMemoryDecisionStore {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<DecisionId, DecisionRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("decision store mutex poisoned".to_string()))
    }
}

impl DecisionStore for InMemoryDecisionStore {
    fn insert(&self, record: DecisionRecord) -> Result<DecisionRecord, StoreError> {
        let mut guard = self.records()?;
        if guard.contains_key(&record.decision_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.decision_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DecisionId) -> Result<Option<DecisionRecord>, StoreError> {
        let guard = self.records()?;
        Ok(guard.get(id).cloned())
    }
}
