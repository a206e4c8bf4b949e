//! Shareable configuration store - repository and save coordinator.
//!
//! This service owns the save-with-collision-retry and
//! fetch-with-visibility-check flows:
//!
//! - `ConfigStore` is the repository seam. The Postgres implementation
//!   relies on a partial unique index over live `share_id` values, so an
//!   insert is atomic with respect to the uniqueness check: of two racing
//!   saves with the same share id exactly one commits and the other gets
//!   `InsertError::Conflict`.
//! - `save_config` is the coordinator. It draws fresh identifiers, retries
//!   a bounded number of times on conflict, and aborts immediately on any
//!   other storage failure.
//!
//! Conflicts are detected structurally (unique-violation flag plus the
//! index name), never by matching error message text.

use crate::{
    db::DbPool,
    error::AppError,
    models::tool_config::{SaveConfigResponse, ToolConfig},
    services::share_id::IdSource,
};
use chrono::{DateTime, Utc};

/// Name of the partial unique index guarding live share ids.
///
/// Must match `migrations/20250901000003_create_tool_configs.sql`.
const SHARE_ID_LIVE_INDEX: &str = "tool_configs_share_id_live_idx";

/// A configuration waiting to be persisted.
///
/// Identifiers are not part of this struct: the coordinator draws fresh
/// ones per attempt, so a conflicted pair is never reused.
#[derive(Debug, Clone)]
pub struct NewToolConfig {
    pub tool_key: String,
    pub config: serde_json::Value,
    pub owner_id: String,
    pub fingerprint: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Insert outcome, with share-id collisions split out from everything else.
///
/// The coordinator retries `Conflict` and propagates `Database` untouched.
/// A unique violation on any *other* constraint is deliberately treated as
/// `Database`: retrying with a new share id would not help there.
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// The share id is already taken by a live record.
    #[error("share id already in use")]
    Conflict,

    /// Any other storage failure (connectivity, timeout, other constraint).
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable storage for `ToolConfig` records.
///
/// Implemented by `PgConfigStore` in production and by an in-memory
/// double in coordinator tests. Append-mostly: no update or delete
/// operation is exposed.
pub trait ConfigStore {
    /// Persist a record under the given identifiers.
    ///
    /// Must fail with `InsertError::Conflict` iff the share id collides
    /// with a live record, and must not leave any visible row behind on
    /// failure.
    async fn insert(
        &self,
        record_id: &str,
        share_id: &str,
        new: &NewToolConfig,
    ) -> Result<ToolConfig, InsertError>;

    /// Look up a record by share id, applying the visibility rule:
    /// not soft-deleted and not past its expiry.
    async fn find_by_share_id(&self, share_id: &str) -> Result<Option<ToolConfig>, sqlx::Error>;
}

/// Postgres-backed `ConfigStore`.
///
/// Holds a pool handle; cloning the pool is cheap (it is reference
/// counted), so the store is constructed per request by the handlers.
#[derive(Debug, Clone)]
pub struct PgConfigStore {
    pool: DbPool,
}

impl PgConfigStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ConfigStore for PgConfigStore {
    async fn insert(
        &self,
        record_id: &str,
        share_id: &str,
        new: &NewToolConfig,
    ) -> Result<ToolConfig, InsertError> {
        let result = sqlx::query_as::<_, ToolConfig>(
            r#"
            INSERT INTO tool_configs (
                id,
                tool_key,
                config,
                share_id,
                owner_id,
                fingerprint,
                expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(record_id)
        .bind(&new.tool_key)
        .bind(&new.config)
        .bind(share_id)
        .bind(&new.owner_id)
        .bind(&new.fingerprint)
        .bind(new.expires_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(record) => Ok(record),
            Err(err) => {
                // Only a unique violation on the live share-id index is a
                // retryable collision; everything else aborts the save.
                if let sqlx::Error::Database(db_err) = &err {
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some(SHARE_ID_LIVE_INDEX)
                    {
                        return Err(InsertError::Conflict);
                    }
                }
                Err(InsertError::Database(err))
            }
        }
    }

    async fn find_by_share_id(&self, share_id: &str) -> Result<Option<ToolConfig>, sqlx::Error> {
        // The visibility rule lives in the query so deleted and expired
        // records are indistinguishable from absent ones.
        sqlx::query_as::<_, ToolConfig>(
            r#"
            SELECT *
            FROM tool_configs
            WHERE share_id = $1
              AND is_deleted = false
              AND (expires_at IS NULL OR expires_at >= NOW())
            "#,
        )
        .bind(share_id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Save a configuration and hand back its share link identifiers.
///
/// # Process
///
/// 1. Validate: non-empty `tool_key`, JSON-object `config`, non-empty
///    `owner_id`. Validation failures are local and never retried.
/// 2. Up to `max_attempts` times: draw a fresh share id and record id,
///    attempt the insert. A conflict discards both identifiers and loops;
///    success returns immediately; any other storage error propagates
///    without further attempts.
/// 3. If every attempt collided, fail with `ShareIdExhausted`.
///
/// # Errors
///
/// - `InvalidRequest`: a precondition failed, nothing was attempted
/// - `ShareIdExhausted`: the retry bound was reached, no visible record
///   was created
/// - `Database`: a non-collision storage failure on some attempt
pub async fn save_config<I, S>(
    ids: &I,
    store: &S,
    max_attempts: u32,
    new: NewToolConfig,
) -> Result<SaveConfigResponse, AppError>
where
    I: IdSource,
    S: ConfigStore,
{
    if new.tool_key.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "tool_key must not be empty".to_string(),
        ));
    }
    if !new.config.is_object() {
        return Err(AppError::InvalidRequest(
            "config must be a JSON object".to_string(),
        ));
    }
    if new.owner_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "owner_id must not be empty".to_string(),
        ));
    }

    for attempt in 1..=max_attempts {
        // Fresh pair each attempt; conflicted identifiers are never reused.
        let record_id = ids.next_record_id();
        let share_id = ids.next_share_id();

        match store.insert(&record_id, &share_id, &new).await {
            Ok(record) => {
                return Ok(SaveConfigResponse {
                    share_id: record.share_id,
                    record_id: record.id,
                });
            }
            Err(InsertError::Conflict) => {
                tracing::warn!(attempt, max_attempts, "share id collision, redrawing");
            }
            Err(InsertError::Database(err)) => return Err(err.into()),
        }
    }

    // Either the identifier space is far too dense or storage is
    // misbehaving; surface it instead of looping forever.
    tracing::error!(max_attempts, "share id allocation exhausted");
    Err(AppError::ShareIdExhausted)
}

/// Fetch a visible configuration by its share id.
///
/// Never-existed, soft-deleted, and expired records all map to the same
/// `ShareNotFound`, so a dead link reveals nothing.
pub async fn get_by_share_id<S: ConfigStore>(
    store: &S,
    share_id: &str,
) -> Result<ToolConfig, AppError> {
    store
        .find_by_share_id(share_id)
        .await?
        .ok_or(AppError::ShareNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Identifier source that serves share ids from a script, then falls
    /// back to numbered ids once the script runs out.
    struct ScriptedIds {
        share_ids: Mutex<VecDeque<String>>,
        record_counter: Mutex<u32>,
    }

    impl ScriptedIds {
        fn new<const N: usize>(share_ids: [&str; N]) -> Self {
            Self {
                share_ids: Mutex::new(share_ids.iter().map(|s| s.to_string()).collect()),
                record_counter: Mutex::new(0),
            }
        }
    }

    impl IdSource for ScriptedIds {
        fn next_share_id(&self) -> String {
            self.share_ids
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "overflow".to_string())
        }

        fn next_record_id(&self) -> String {
            let mut counter = self.record_counter.lock().unwrap();
            *counter += 1;
            format!("cfg_test{counter:020}")
        }
    }

    /// In-memory `ConfigStore` mirroring the live-uniqueness and
    /// visibility rules of the Postgres schema, with an attempt counter
    /// so tests can assert how many inserts the coordinator issued.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<ToolConfig>>,
        insert_attempts: Mutex<u32>,
        fail_with: Mutex<Option<sqlx::Error>>,
    }

    impl MemoryStore {
        fn with_live_share_id(share_id: &str) -> Self {
            let store = Self::default();
            store
                .records
                .lock()
                .unwrap()
                .push(record(share_id, json!({"seed": true}), false, None));
            store
        }

        fn attempts(&self) -> u32 {
            *self.insert_attempts.lock().unwrap()
        }

        fn live_count(&self) -> usize {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| !r.is_deleted)
                .count()
        }
    }

    impl ConfigStore for MemoryStore {
        async fn insert(
            &self,
            record_id: &str,
            share_id: &str,
            new: &NewToolConfig,
        ) -> Result<ToolConfig, InsertError> {
            *self.insert_attempts.lock().unwrap() += 1;

            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(InsertError::Database(err));
            }

            let mut records = self.records.lock().unwrap();
            if records
                .iter()
                .any(|r| !r.is_deleted && r.share_id == share_id)
            {
                return Err(InsertError::Conflict);
            }

            let now = chrono::Utc::now();
            let stored = ToolConfig {
                id: record_id.to_string(),
                tool_key: new.tool_key.clone(),
                config: new.config.clone(),
                share_id: share_id.to_string(),
                owner_id: new.owner_id.clone(),
                fingerprint: new.fingerprint.clone(),
                expires_at: new.expires_at,
                is_deleted: false,
                created_at: now,
                updated_at: now,
            };
            records.push(stored.clone());
            Ok(stored)
        }

        async fn find_by_share_id(
            &self,
            share_id: &str,
        ) -> Result<Option<ToolConfig>, sqlx::Error> {
            let now = chrono::Utc::now();
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| {
                    r.share_id == share_id
                        && !r.is_deleted
                        && r.expires_at.is_none_or(|at| at >= now)
                })
                .cloned())
        }
    }

    fn record(
        share_id: &str,
        config: serde_json::Value,
        is_deleted: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> ToolConfig {
        let now = chrono::Utc::now();
        ToolConfig {
            id: format!("cfg_seed{share_id}"),
            tool_key: "warm-text-card".to_string(),
            config,
            share_id: share_id.to_string(),
            owner_id: "user-42".to_string(),
            fingerprint: None,
            expires_at,
            is_deleted,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_config() -> NewToolConfig {
        NewToolConfig {
            tool_key: "warm-text-card".to_string(),
            config: json!({"theme": "warm", "maxCards": 12}),
            owner_id: "user-42".to_string(),
            fingerprint: None,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn save_then_fetch_round_trips_the_payload() {
        let ids = ScriptedIds::new(["Xk92kaZ1Qm3f"]);
        let store = MemoryStore::default();

        let saved = save_config(&ids, &store, 3, new_config()).await.unwrap();
        assert_eq!(saved.share_id, "Xk92kaZ1Qm3f");
        assert!(saved.record_id.starts_with("cfg_"));

        let fetched = get_by_share_id(&store, "Xk92kaZ1Qm3f").await.unwrap();
        assert_eq!(fetched.tool_key, "warm-text-card");
        assert_eq!(fetched.config, json!({"theme": "warm", "maxCards": 12}));
    }

    #[tokio::test]
    async fn collision_is_retried_with_fresh_identifiers() {
        // First two draws collide with the seeded record, third is free.
        let ids = ScriptedIds::new(["TAKEN", "TAKEN", "FRESH"]);
        let store = MemoryStore::with_live_share_id("TAKEN");

        let saved = save_config(&ids, &store, 3, new_config()).await.unwrap();

        assert_eq!(saved.share_id, "FRESH");
        assert_eq!(store.attempts(), 3);
        // The record id drawn on the winning attempt, not a reused one.
        assert_eq!(saved.record_id, "cfg_test00000000000000000003");
    }

    #[tokio::test]
    async fn exhausted_retries_leave_no_visible_record() {
        let ids = ScriptedIds::new(["TAKEN", "TAKEN", "TAKEN"]);
        let store = MemoryStore::with_live_share_id("TAKEN");

        let err = save_config(&ids, &store, 3, new_config())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ShareIdExhausted));
        assert_eq!(store.attempts(), 3);
        // Only the seeded record survives.
        assert_eq!(store.live_count(), 1);
    }

    #[tokio::test]
    async fn retry_bound_is_tunable() {
        let ids = ScriptedIds::new(["TAKEN", "TAKEN", "TAKEN", "TAKEN", "TAKEN"]);
        let store = MemoryStore::with_live_share_id("TAKEN");

        let err = save_config(&ids, &store, 5, new_config())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ShareIdExhausted));
        assert_eq!(store.attempts(), 5);
    }

    #[tokio::test]
    async fn non_conflict_storage_error_aborts_immediately() {
        let ids = ScriptedIds::new(["A", "B", "C"]);
        let store = MemoryStore::default();
        *store.fail_with.lock().unwrap() = Some(sqlx::Error::PoolTimedOut);

        let err = save_config(&ids, &store, 3, new_config())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(store.attempts(), 1);
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_store() {
        let ids = ScriptedIds::new(["A"]);
        let store = MemoryStore::default();

        let mut bad = new_config();
        bad.tool_key = "   ".to_string();
        assert!(matches!(
            save_config(&ids, &store, 3, bad).await.unwrap_err(),
            AppError::InvalidRequest(_)
        ));

        let mut bad = new_config();
        bad.config = json!("just a string");
        assert!(matches!(
            save_config(&ids, &store, 3, bad).await.unwrap_err(),
            AppError::InvalidRequest(_)
        ));

        let mut bad = new_config();
        bad.owner_id = String::new();
        assert!(matches!(
            save_config(&ids, &store, 3, bad).await.unwrap_err(),
            AppError::InvalidRequest(_)
        ));

        assert_eq!(store.attempts(), 0);
    }

    #[tokio::test]
    async fn expired_record_reads_as_not_found_even_right_after_save() {
        let ids = ScriptedIds::new(["EXPIRED12345"]);
        let store = MemoryStore::default();

        let mut lapsed = new_config();
        lapsed.expires_at = Some(chrono::Utc::now() - chrono::Duration::hours(1));
        save_config(&ids, &store, 3, lapsed).await.unwrap();

        let err = get_by_share_id(&store, "EXPIRED12345").await.unwrap_err();
        assert!(matches!(err, AppError::ShareNotFound));
    }

    #[tokio::test]
    async fn deleted_record_is_indistinguishable_from_absent() {
        let store = MemoryStore::default();
        store.records.lock().unwrap().push(record(
            "GONE12345678",
            json!({"theme": "warm"}),
            true,
            None,
        ));

        let deleted = get_by_share_id(&store, "GONE12345678").await.unwrap_err();
        let absent = get_by_share_id(&store, "NEVEREXISTED").await.unwrap_err();

        assert!(matches!(deleted, AppError::ShareNotFound));
        assert!(matches!(absent, AppError::ShareNotFound));
    }

    #[tokio::test]
    async fn deleted_share_id_can_be_reused() {
        // Live-uniqueness only: a soft-deleted record does not block a new
        // save under the same share id.
        let ids = ScriptedIds::new(["REUSED123456"]);
        let store = MemoryStore::default();
        store.records.lock().unwrap().push(record(
            "REUSED123456",
            json!({"old": true}),
            true,
            None,
        ));

        let saved = save_config(&ids, &store, 3, new_config()).await.unwrap();
        assert_eq!(saved.share_id, "REUSED123456");
        assert_eq!(store.attempts(), 1);
    }
}
