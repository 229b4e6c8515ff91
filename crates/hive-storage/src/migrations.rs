// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary. Migrations are
//! additive only: each version creates collections that do not exist yet.

use hive_core::HiveError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations and return the resulting schema version.
///
/// Refinery records applied versions in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<u32, HiveError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| HiveError::StoreOpen {
            source: Box::new(e),
        })?;

    for migration in report.applied_migrations() {
        tracing::info!(
            version = migration.version(),
            name = migration.name(),
            "applied schema migration"
        );
    }

    schema_version(conn).map_err(|e| HiveError::StoreOpen {
        source: Box::new(e),
    })
}

/// Highest applied migration version, or 0 on a fresh file.
pub fn schema_version(conn: &rusqlite::Connection) -> Result<u32, rusqlite::Error> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM refinery_schema_history",
        [],
        |row| row.get(0),
    )
}
