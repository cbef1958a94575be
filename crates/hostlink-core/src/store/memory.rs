// In-process store backed by DashMap.
//
// Reads go straight to the maps. Writers take one guard so the
// project row and the domain-claim index always change together.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::{DomainStore, StoreError};
use crate::model::record::next_updated_at;
use crate::model::{DomainRecord, VerificationStatus, VerificationUpdate};

#[derive(Debug, Default)]
pub struct MemoryStore {
    by_project: DashMap<String, Arc<DomainRecord>>,
    /// custom domain -> owning project id
    claims: DashMap<String, String>,
    write_guard: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_project.is_empty()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_guard
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store write guard poisoned".into()))
    }

    fn upsert_locked(&self, mut record: DomainRecord) -> Result<DomainRecord, StoreError> {
        let _guard = self.lock()?;

        let claimed_by = self
            .claims
            .get(&record.custom_domain)
            .map(|owner| owner.value().clone());
        if let Some(owner) = claimed_by.filter(|owner| *owner != record.project_id) {
            return Err(StoreError::DuplicateDomain {
                domain: record.custom_domain,
                claimed_by: Some(owner),
            });
        }

        let previous = self
            .by_project
            .get(&record.project_id)
            .map(|r| Arc::clone(r.value()));
        if let Some(prev) = previous {
            record.created_at = prev.created_at;
            record.updated_at = next_updated_at(prev.updated_at, record.updated_at);
            if prev.custom_domain != record.custom_domain {
                self.claims.remove(&prev.custom_domain);
            }
        }

        self.claims
            .insert(record.custom_domain.clone(), record.project_id.clone());
        self.by_project
            .insert(record.project_id.clone(), Arc::new(record.clone()));
        debug!(project_id = %record.project_id, domain = %record.custom_domain, "record upserted");
        Ok(record)
    }

    fn update_locked(
        &self,
        project_id: &str,
        domain: &str,
        update: VerificationUpdate,
    ) -> Result<Option<DomainRecord>, StoreError> {
        let _guard = self.lock()?;

        let current = self.by_project.get(project_id).map(|r| Arc::clone(r.value()));
        let Some(current) = current.filter(|r| r.custom_domain == domain) else {
            return Ok(None);
        };

        let mut next = (*current).clone();
        next.status = VerificationStatus::new(
            update.ownership_verified,
            update
                .routing_verified
                .unwrap_or(current.status.routing_verified()),
        );
        if let Some(required_dns) = update.required_dns {
            next.required_dns = required_dns;
        }
        next.updated_at = next_updated_at(current.updated_at, update.updated_at);

        self.by_project
            .insert(project_id.to_owned(), Arc::new(next.clone()));
        Ok(Some(next))
    }
}

#[async_trait]
impl DomainStore for MemoryStore {
    async fn upsert(&self, record: DomainRecord) -> Result<DomainRecord, StoreError> {
        self.upsert_locked(record)
    }

    async fn update_verification(
        &self,
        project_id: &str,
        domain: &str,
        update: VerificationUpdate,
    ) -> Result<Option<DomainRecord>, StoreError> {
        self.update_locked(project_id, domain, update)
    }

    async fn get(&self, project_id: &str) -> Result<Option<DomainRecord>, StoreError> {
        Ok(self
            .by_project
            .get(project_id)
            .map(|r| DomainRecord::clone(r.value())))
    }

    async fn list(&self) -> Result<Vec<DomainRecord>, StoreError> {
        let mut records: Vec<DomainRecord> = self
            .by_project
            .iter()
            .map(|r| DomainRecord::clone(r.value()))
            .collect();
        records.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        Ok(records)
    }
}
