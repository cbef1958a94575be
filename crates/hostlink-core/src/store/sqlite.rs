// SQLite-backed store
//
// Single table `custom_domains`. Attach is one `INSERT ... ON CONFLICT DO
// UPDATE`, verify is one conditional `UPDATE`; both hand the stored row back
// through `RETURNING`. Timestamps are integer microseconds since the epoch
// and `required_dns` is a JSON array. All calls run on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::{DomainStore, StoreError};
use crate::model::{DnsRecord, DomainRecord, VerificationStatus, VerificationUpdate};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS custom_domains (
    project_id          TEXT PRIMARY KEY NOT NULL,
    project_name        TEXT NOT NULL,
    deployment_url      TEXT NOT NULL,
    custom_domain       TEXT NOT NULL UNIQUE,
    required_dns        TEXT NOT NULL DEFAULT '[]',
    ownership_verified  INTEGER NOT NULL DEFAULT 0,
    routing_verified    INTEGER NOT NULL DEFAULT 0,
    fully_verified      INTEGER NOT NULL DEFAULT 0,
    created_at          INTEGER NOT NULL,
    updated_at          INTEGER NOT NULL
);
";

const COLUMNS: &str = "project_id, project_name, deployment_url, custom_domain, required_dns, \
                       ownership_verified, routing_verified, created_at, updated_at";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let conn = Connection::open(&path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "sqlite journal mode");
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::init(&conn)?;

        info!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// A private database that lives as long as this store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("store task failed: {e}")))?
    }
}

// ── Statements ──────────────────────────────────────────────────────

fn upsert_row(conn: &Connection, record: &DomainRecord) -> Result<DomainRecord, StoreError> {
    let sql = format!(
        "INSERT INTO custom_domains (project_id, project_name, deployment_url, custom_domain,
             required_dns, ownership_verified, routing_verified, fully_verified,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(project_id) DO UPDATE SET
             project_name       = excluded.project_name,
             deployment_url     = excluded.deployment_url,
             custom_domain      = excluded.custom_domain,
             required_dns       = excluded.required_dns,
             ownership_verified = excluded.ownership_verified,
             routing_verified   = excluded.routing_verified,
             fully_verified     = excluded.fully_verified,
             updated_at         = MAX(excluded.updated_at, custom_domains.updated_at + 1)
         RETURNING {COLUMNS}"
    );

    let result = conn.query_row(
        &sql,
        params![
            record.project_id,
            record.project_name,
            record.deployment_url,
            record.custom_domain,
            serde_json::to_string(&record.required_dns)?,
            record.status.ownership_verified(),
            record.status.routing_verified(),
            record.status.fully_verified(),
            record.created_at.timestamp_micros(),
            record.updated_at.timestamp_micros(),
        ],
        RawRow::from_row,
    );

    match result {
        Ok(raw) => raw.into_record(),
        Err(e) if is_unique_violation(&e) => {
            let claimed_by = conn
                .query_row(
                    "SELECT project_id FROM custom_domains WHERE custom_domain = ?1",
                    [&record.custom_domain],
                    |row| row.get(0),
                )
                .optional()?;
            Err(StoreError::DuplicateDomain {
                domain: record.custom_domain.clone(),
                claimed_by,
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn update_row(
    conn: &Connection,
    project_id: &str,
    domain: &str,
    update: &VerificationUpdate,
) -> Result<Option<DomainRecord>, StoreError> {
    let required_dns = update
        .required_dns
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let sql = format!(
        "UPDATE custom_domains SET
             ownership_verified = ?3,
             routing_verified   = COALESCE(?4, routing_verified),
             fully_verified     = (?3 AND COALESCE(?4, routing_verified)),
             required_dns       = COALESCE(?5, required_dns),
             updated_at         = MAX(?6, updated_at + 1)
         WHERE project_id = ?1 AND custom_domain = ?2
         RETURNING {COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            project_id,
            domain,
            update.ownership_verified,
            update.routing_verified,
            required_dns,
            update.updated_at.timestamp_micros(),
        ],
        RawRow::from_row,
    )
    .optional()?
    .map(RawRow::into_record)
    .transpose()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

// ── Row decoding ────────────────────────────────────────────────────

/// Column values as read, before JSON and timestamp decoding.
struct RawRow {
    project_id: String,
    project_name: String,
    deployment_url: String,
    custom_domain: String,
    required_dns: String,
    ownership_verified: bool,
    routing_verified: bool,
    created_at: i64,
    updated_at: i64,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            project_id: row.get(0)?,
            project_name: row.get(1)?,
            deployment_url: row.get(2)?,
            custom_domain: row.get(3)?,
            required_dns: row.get(4)?,
            ownership_verified: row.get(5)?,
            routing_verified: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<DomainRecord, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            project_id: self.project_id.clone(),
            reason,
        };

        let required_dns: Vec<DnsRecord> = serde_json::from_str(&self.required_dns)
            .map_err(|e| corrupt(format!("required_dns: {e}")))?;
        let created_at = micros_to_datetime(self.created_at)
            .ok_or_else(|| corrupt(format!("created_at out of range: {}", self.created_at)))?;
        let updated_at = micros_to_datetime(self.updated_at)
            .ok_or_else(|| corrupt(format!("updated_at out of range: {}", self.updated_at)))?;

        Ok(DomainRecord {
            status: VerificationStatus::new(self.ownership_verified, self.routing_verified),
            project_id: self.project_id,
            project_name: self.project_name,
            deployment_url: self.deployment_url,
            custom_domain: self.custom_domain,
            required_dns,
            created_at,
            updated_at,
        })
    }
}

fn micros_to_datetime(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

// ── DomainStore ─────────────────────────────────────────────────────

#[async_trait]
impl DomainStore for SqliteStore {
    async fn upsert(&self, record: DomainRecord) -> Result<DomainRecord, StoreError> {
        let stored = self.with_conn(move |conn| upsert_row(conn, &record)).await?;
        debug!(project_id = %stored.project_id, domain = %stored.custom_domain, "record upserted");
        Ok(stored)
    }

    async fn update_verification(
        &self,
        project_id: &str,
        domain: &str,
        update: VerificationUpdate,
    ) -> Result<Option<DomainRecord>, StoreError> {
        let project_id = project_id.to_owned();
        let domain = domain.to_owned();
        self.with_conn(move |conn| update_row(conn, &project_id, &domain, &update))
            .await
    }

    async fn get(&self, project_id: &str) -> Result<Option<DomainRecord>, StoreError> {
        let project_id = project_id.to_owned();
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM custom_domains WHERE project_id = ?1"),
                [&project_id],
                RawRow::from_row,
            )
            .optional()?
            .map(RawRow::into_record)
            .transpose()
        })
        .await
    }

    async fn list(&self) -> Result<Vec<DomainRecord>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM custom_domains ORDER BY project_id"
            ))?;
            let rows = stmt.query_map([], RawRow::from_row)?;
            rows.map(|row| row.map_err(StoreError::from).and_then(RawRow::into_record))
                .collect()
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::super::conformance;
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        conformance::upsert_is_idempotent(&store()).await;
    }

    #[tokio::test]
    async fn upsert_replaces_everything_but_created_at() {
        conformance::upsert_replaces_everything_but_created_at(&store()).await;
    }

    #[tokio::test]
    async fn rejects_second_claim() {
        conformance::rejects_second_claim(&store()).await;
    }

    #[tokio::test]
    async fn rejects_move_onto_claimed_domain() {
        conformance::rejects_move_onto_claimed_domain(&store()).await;
    }

    #[tokio::test]
    async fn update_verification_touches_only_flags() {
        conformance::update_verification_touches_only_flags(&store()).await;
    }

    #[tokio::test]
    async fn update_verification_requires_matching_domain() {
        conformance::update_verification_requires_matching_domain(&store()).await;
    }

    #[tokio::test]
    async fn list_is_ordered_by_project() {
        conformance::list_is_ordered_by_project(&store()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_attaches_leave_one_row() {
        let store: Arc<dyn DomainStore> = Arc::new(store());
        conformance::concurrent_attaches_leave_one_row(&store).await;
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hostlink.db");

        let written = {
            let store = SqliteStore::open(&path).unwrap();
            assert_eq!(store.path(), Some(path.as_path()));
            store
                .upsert(conformance::record("proj1", "example.com"))
                .await
                .unwrap()
        };

        let reopened = SqliteStore::open(&path).unwrap();
        let read = reopened.get("proj1").await.unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(read.required_dns.len(), 2);
    }

    #[tokio::test]
    async fn fully_verified_column_tracks_flags() {
        let store = store();
        let mut record = conformance::record("proj1", "example.com");
        record.status = VerificationStatus::new(true, false);
        store.upsert(record).await.unwrap();

        store
            .update_verification(
                "proj1",
                "example.com",
                VerificationUpdate {
                    ownership_verified: true,
                    routing_verified: Some(true),
                    required_dns: None,
                    updated_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let fully: bool = store
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT fully_verified FROM custom_domains WHERE project_id = 'proj1'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert!(fully);
    }
}
