// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes; the only other
//! connection ever opened is the short-lived blocking one that applies
//! migrations before the writer starts.

use std::path::Path;

use hive_config::model::StorageConfig;
use hive_core::HiveError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations;

/// Convert a tokio-rusqlite failure into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> HiveError {
    HiveError::Storage {
        source: Box::new(e),
    }
}

fn open_err<E>(e: E) -> HiveError
where
    E: std::error::Error + Send + Sync + 'static,
{
    HiveError::StoreOpen {
        source: Box::new(e),
    }
}

fn apply_pragmas(conn: &rusqlite::Connection, wal_mode: bool) -> Result<(), rusqlite::Error> {
    if wal_mode {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }
    conn.execute_batch(
        "PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
}

/// Handle to the on-disk store.
///
/// Opening a `Database` is idempotent: the schema is created or upgraded in
/// place, and data written under an earlier version is never touched.
pub struct Database {
    conn: Connection,
    path: String,
    schema_version: u32,
}

impl Database {
    /// Open (or create) the store at `path` with WAL enabled.
    pub async fn open(path: &str) -> Result<Self, HiveError> {
        Self::open_with(path, true).await
    }

    /// Open the store described by a storage config section.
    pub async fn open_config(config: &StorageConfig) -> Result<Self, HiveError> {
        Self::open_with(&config.database_path, config.wal_mode).await
    }

    /// Open (or create) the store, run pending migrations, then start the
    /// single background writer.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, HiveError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(open_err)?;
            }
        }

        let migrate_path = path.to_string();
        let schema_version = tokio::task::spawn_blocking(move || -> Result<u32, HiveError> {
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(open_err)?;
            apply_pragmas(&conn, wal_mode).map_err(open_err)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(open_err)??;

        let conn = Connection::open(path).await.map_err(open_err)?;
        conn.call(move |conn| -> Result<(), rusqlite::Error> { apply_pragmas(conn, wal_mode) })
            .await
            .map_err(open_err)?;

        info!(path, schema_version, "store opened");
        Ok(Self {
            conn,
            path: path.to_string(),
            schema_version,
        })
    }

    /// The async connection every query goes through.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Schema version reached when the store was opened.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Checkpoint the WAL into the main file without closing.
    pub async fn checkpoint(&self) -> Result<(), HiveError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), HiveError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!(path = %self.path, "store closed");
        Ok(())
    }
}
