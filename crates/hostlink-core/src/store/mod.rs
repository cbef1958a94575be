// ── Attachment persistence ──
//
// One row per project, keyed by project id, with the custom domain unique
// across rows. Every mutation is a single atomic store call; callers never
// read-modify-write verification flags.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{DomainRecord, VerificationUpdate};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("domain {domain} is already claimed by {}", .claimed_by.as_deref().unwrap_or("another project"))]
    DuplicateDomain {
        domain: String,
        claimed_by: Option<String>,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt row for project {project_id}: {reason}")]
    Corrupt { project_id: String, reason: String },

    #[error("record encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Insert or fully replace the project's record.
    ///
    /// `created_at` of an existing row is kept and `updated_at` moves
    /// strictly forward. Returns the row as stored.
    async fn upsert(&self, record: DomainRecord) -> Result<DomainRecord, StoreError>;

    /// Apply a verification-only update to the row matching both
    /// `project_id` and `domain`. `None` when no row matched.
    async fn update_verification(
        &self,
        project_id: &str,
        domain: &str,
        update: VerificationUpdate,
    ) -> Result<Option<DomainRecord>, StoreError>;

    async fn get(&self, project_id: &str) -> Result<Option<DomainRecord>, StoreError>;

    /// All records, ordered by project id.
    async fn list(&self) -> Result<Vec<DomainRecord>, StoreError>;
}

/// Behavior every `DomainStore` must share.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod conformance {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::{DomainStore, StoreError};
    use crate::model::{DnsRecord, DomainRecord, VerificationStatus, VerificationUpdate};

    pub fn record(project_id: &str, domain: &str) -> DomainRecord {
        let now = crate::model::record::now();
        DomainRecord {
            project_id: project_id.into(),
            project_name: "app-x1".into(),
            deployment_url: "https://app-x1.deployer.app".into(),
            custom_domain: domain.into(),
            required_dns: vec![
                DnsRecord::txt(format!("_vercel.{domain}"), "abc123"),
                DnsRecord::apex_a("76.76.21.21"),
            ],
            status: VerificationStatus::new(false, false),
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn upsert_is_idempotent(store: &dyn DomainStore) {
        let first = store.upsert(record("proj1", "example.com")).await.unwrap();

        let mut again = record("proj1", "example.com");
        again.created_at = first.created_at + Duration::days(1);
        again.updated_at = first.updated_at - Duration::seconds(1);
        let second = store.upsert(again).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    pub async fn upsert_replaces_everything_but_created_at(store: &dyn DomainStore) {
        let first = store.upsert(record("proj1", "example.com")).await.unwrap();

        let mut moved = record("proj1", "blog.example.com");
        moved.deployment_url = "https://app-x2.deployer.app".into();
        moved.required_dns = vec![DnsRecord::cname("blog", "cname.deployer.app")];
        moved.status = VerificationStatus::new(true, false);
        store.upsert(moved).await.unwrap();

        let stored = store.get("proj1").await.unwrap().unwrap();
        assert_eq!(stored.custom_domain, "blog.example.com");
        assert_eq!(stored.deployment_url, "https://app-x2.deployer.app");
        assert_eq!(
            stored.required_dns,
            vec![DnsRecord::cname("blog", "cname.deployer.app")]
        );
        assert_eq!(stored.status, VerificationStatus::new(true, false));
        assert_eq!(stored.created_at, first.created_at);

        // The old domain is free again.
        store.upsert(record("proj2", "example.com")).await.unwrap();
    }

    pub async fn rejects_second_claim(store: &dyn DomainStore) {
        store.upsert(record("proj1", "example.com")).await.unwrap();
        let err = store
            .upsert(record("proj2", "example.com"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, StoreError::DuplicateDomain { ref domain, ref claimed_by }
                if domain == "example.com" && claimed_by.as_deref() == Some("proj1")),
            "got {err:?}"
        );
        assert!(store.get("proj2").await.unwrap().is_none());
    }

    pub async fn rejects_move_onto_claimed_domain(store: &dyn DomainStore) {
        store.upsert(record("proj1", "a.com")).await.unwrap();
        store.upsert(record("proj2", "b.com")).await.unwrap();

        let err = store.upsert(record("proj1", "b.com")).await.unwrap_err();
        assert!(
            matches!(err, StoreError::DuplicateDomain { ref domain, ref claimed_by }
                if domain == "b.com" && claimed_by.as_deref() == Some("proj2")),
            "got {err:?}"
        );
        assert_eq!(store.get("proj1").await.unwrap().unwrap().custom_domain, "a.com");
        assert_eq!(store.get("proj2").await.unwrap().unwrap().custom_domain, "b.com");
    }

    pub async fn update_verification_touches_only_flags(store: &dyn DomainStore) {
        let first = store.upsert(record("proj1", "example.com")).await.unwrap();

        let update = VerificationUpdate {
            ownership_verified: true,
            routing_verified: Some(true),
            required_dns: None,
            updated_at: first.updated_at,
        };
        let updated = store
            .update_verification("proj1", "example.com", update)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.status.fully_verified());
        assert_eq!(updated.required_dns, first.required_dns);
        assert!(updated.updated_at > first.updated_at);

        // Routing left alone when not supplied.
        let update = VerificationUpdate {
            ownership_verified: false,
            routing_verified: None,
            required_dns: Some(vec![DnsRecord::apex_a("76.76.21.22")]),
            updated_at: Utc::now(),
        };
        let updated = store
            .update_verification("proj1", "example.com", update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, VerificationStatus::new(false, true));
        assert_eq!(updated.required_dns, vec![DnsRecord::apex_a("76.76.21.22")]);
        assert_eq!(store.get("proj1").await.unwrap(), Some(updated));
    }

    pub async fn update_verification_requires_matching_domain(store: &dyn DomainStore) {
        store.upsert(record("proj1", "example.com")).await.unwrap();
        let update = VerificationUpdate {
            ownership_verified: true,
            routing_verified: Some(true),
            required_dns: None,
            updated_at: Utc::now(),
        };
        assert!(
            store
                .update_verification("proj1", "other.com", update.clone())
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .update_verification("nobody", "example.com", update)
                .await
                .unwrap()
                .is_none()
        );
        let stored = store.get("proj1").await.unwrap().unwrap();
        assert!(!stored.status.ownership_verified());
    }

    pub async fn list_is_ordered_by_project(store: &dyn DomainStore) {
        for (p, d) in [("proj3", "c.com"), ("proj1", "a.com"), ("proj2", "b.com")] {
            store.upsert(record(p, d)).await.unwrap();
        }
        let ids: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.project_id)
            .collect();
        assert_eq!(ids, vec!["proj1", "proj2", "proj3"]);
    }

    pub async fn concurrent_attaches_leave_one_row(store: &Arc<dyn DomainStore>) {
        let a = {
            let store = Arc::clone(store);
            tokio::spawn(async move { store.upsert(record("proj1", "one.example.com")).await })
        };
        let b = {
            let store = Arc::clone(store);
            tokio::spawn(async move { store.upsert(record("proj1", "two.example.com")).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let rows = store.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        let winner = rows[0].custom_domain.clone();
        assert!(winner == "one.example.com" || winner == "two.example.com");

        // The losing domain holds no stale claim.
        let loser = if winner == "one.example.com" {
            "two.example.com"
        } else {
            "one.example.com"
        };
        store.upsert(record("proj2", loser)).await.unwrap();
    }
}
