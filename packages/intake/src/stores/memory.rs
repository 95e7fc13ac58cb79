//! In-memory job storage for testing and local-only deployments.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::traits::store::JobStore;
use crate::types::payload::{JobPayload, JobRecord};

/// In-memory job store.
///
/// Data is lost on restart; suitable for development and for running
/// with no database configured.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Vec<JobRecord>>,
}

impl MemoryJobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs.
    pub fn count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn upsert(&self, payload: &JobPayload) -> Result<()> {
        let mut jobs = self.jobs.write().unwrap();
        let duplicate = jobs
            .iter()
            .any(|record| record.payload.confirmation_code == payload.confirmation_code);
        if !duplicate {
            jobs.push(JobRecord {
                payload: payload.clone(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn list(&self, source_channel: Option<&str>) -> Result<Vec<JobRecord>> {
        let jobs = self.jobs.read().unwrap();
        let mut records: Vec<JobRecord> = jobs
            .iter()
            .filter(|record| {
                source_channel
                    .map(|source| record.payload.source_channel == source)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fields::{FieldKey, FieldMap};

    fn payload(code: &str, source: &str) -> JobPayload {
        let mut fields = FieldMap::new();
        fields.insert(FieldKey::Title, "Barista".into());
        fields.insert(FieldKey::PayRate, "$20/hr".into());
        fields.insert(FieldKey::PayType, "hourly".into());
        fields.insert(FieldKey::Location, "123 Market St".into());
        fields.insert(FieldKey::ShiftTimes, "Sat-Sun 7am-1pm".into());
        fields.insert(FieldKey::ContactPhone, "+15551234567".into());
        fields.insert(FieldKey::BusinessName, "Moonlight Cafe".into());
        JobPayload::from_fields(code, source, "key", &fields, vec![]).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_confirmation_code_is_a_no_op() {
        let store = MemoryJobStore::new();
        let job = payload("JOB-2608-AAAAA", "wa");

        store.upsert(&job).await.unwrap();
        store.upsert(&job).await.unwrap();

        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_source_and_orders_newest_first() {
        let store = MemoryJobStore::new();
        store.upsert(&payload("JOB-2608-AAAAA", "wa")).await.unwrap();
        store.upsert(&payload("JOB-2608-BBBBB", "web")).await.unwrap();
        store.upsert(&payload("JOB-2608-CCCCC", "wa")).await.unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].created_at >= all[2].created_at);

        let wa_only = store.list(Some("wa")).await.unwrap();
        assert_eq!(wa_only.len(), 2);
        assert!(wa_only
            .iter()
            .all(|record| record.payload.source_channel == "wa"));
    }
}
