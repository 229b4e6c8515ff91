// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed key/value access to the named collections.
//!
//! Writes return errors. Reads never do: a failed query or an undecodable
//! value becomes [`ReadOutcome::Degraded`] after a `warn` log.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use hive_core::types::{KnowledgeBase, SharedInsight, User};
use hive_core::{AdapterType, HealthStatus, HiveError, PluginAdapter};

use crate::collections::{Collection, ReadOutcome};
use crate::database::{Database, map_tr_err};

/// Values that carry their own key (in-line keys).
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.username
    }
}

impl Keyed for KnowledgeBase {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for SharedInsight {
    fn key(&self) -> &str {
        &self.id
    }
}

fn encode<V: Serialize + ?Sized>(value: &V) -> Result<String, HiveError> {
    serde_json::to_string(value).map_err(|e| HiveError::Storage {
        source: Box::new(e),
    })
}

fn degraded<T>(collection: Collection, key: Option<&str>, reason: String) -> ReadOutcome<T> {
    warn!(%collection, key, %reason, "store read failed, treating as absent");
    ReadOutcome::Degraded { reason }
}

/// Collection store over a single [`Database`].
pub struct Store {
    db: Database,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path` and wrap it.
    pub async fn open(path: &str) -> Result<Self, HiveError> {
        Ok(Self::new(Database::open(path).await?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn schema_version(&self) -> u32 {
        self.db.schema_version()
    }

    /// Read one value by key.
    pub async fn get<V>(&self, collection: Collection, key: &str) -> ReadOutcome<V>
    where
        V: DeserializeOwned,
    {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", collection.table());
        let owned_key = key.to_string();
        let result = self
            .db
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(&sql, rusqlite::params![owned_key], |row| row.get(0))
                    .optional()
            })
            .await;

        match result {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => ReadOutcome::Found(value),
                Err(e) => degraded(collection, Some(key), format!("undecodable value: {e}")),
            },
            Ok(None) => ReadOutcome::Absent,
            Err(e) => degraded(collection, Some(key), e.to_string()),
        }
    }

    /// Read every value in a collection, in key order.
    ///
    /// Entries that fail to decode are skipped with a warning; a failed query
    /// degrades the whole read.
    pub async fn get_all<V>(&self, collection: Collection) -> ReadOutcome<Vec<V>>
    where
        V: DeserializeOwned,
    {
        let sql = format!("SELECT key, value FROM {} ORDER BY key", collection.table());
        let result = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<(String, String)>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await;

        let rows = match result {
            Ok(rows) => rows,
            Err(e) => return degraded(collection, None, e.to_string()),
        };

        let mut values = Vec::with_capacity(rows.len());
        for (key, raw) in rows {
            match serde_json::from_str(&raw) {
                Ok(value) => values.push(value),
                Err(e) => warn!(%collection, key, error = %e, "skipping undecodable entry"),
            }
        }
        ReadOutcome::Found(values)
    }

    /// Insert or replace the value stored under `key`.
    pub async fn put<V>(&self, collection: Collection, key: &str, value: &V) -> Result<(), HiveError>
    where
        V: Serialize + ?Sized,
    {
        let raw = encode(value)?;
        let sql = format!(
            "INSERT INTO {} (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            collection.table()
        );
        let owned_key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(&sql, rusqlite::params![owned_key, raw])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(%collection, key, "put");
        Ok(())
    }

    /// Put a value under its own in-line key.
    pub async fn put_keyed<V>(&self, collection: Collection, value: &V) -> Result<(), HiveError>
    where
        V: Serialize + Keyed,
    {
        self.put(collection, value.key(), value).await
    }

    /// Insert only if `key` is not present. Returns `false` when the key
    /// already existed and nothing was written.
    pub async fn insert<V>(&self, collection: Collection, key: &str, value: &V) -> Result<bool, HiveError>
    where
        V: Serialize + ?Sized,
    {
        let raw = encode(value)?;
        let sql = format!(
            "INSERT INTO {} (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO NOTHING",
            collection.table()
        );
        let owned_key = key.to_string();
        let changed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(&sql, rusqlite::params![owned_key, raw])
            })
            .await
            .map_err(map_tr_err)?;
        Ok(changed == 1)
    }

    /// Delete the value under `key`. Returns whether anything was removed.
    pub async fn delete(&self, collection: Collection, key: &str) -> Result<bool, HiveError> {
        let sql = format!("DELETE FROM {} WHERE key = ?1", collection.table());
        let owned_key = key.to_string();
        let changed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(&sql, rusqlite::params![owned_key])
            })
            .await
            .map_err(map_tr_err)?;
        debug!(%collection, key, removed = changed > 0, "delete");
        Ok(changed > 0)
    }

    /// Delete several keys in one transaction. Returns the number removed.
    pub async fn delete_many(&self, collection: Collection, keys: Vec<String>) -> Result<usize, HiveError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let sql = format!("DELETE FROM {} WHERE key = ?1", collection.table());
        self.db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                let tx = conn.transaction()?;
                let mut removed = 0;
                {
                    let mut stmt = tx.prepare(&sql)?;
                    for key in &keys {
                        removed += stmt.execute(rusqlite::params![key])?;
                    }
                }
                tx.commit()?;
                Ok(removed)
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the underlying database.
    pub async fn close(self) -> Result<(), HiveError> {
        self.db.close().await
    }
}

#[async_trait]
impl PluginAdapter for Store {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HiveError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HiveError> {
        self.db.checkpoint().await
    }
}
