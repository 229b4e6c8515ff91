// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Hive knowledge layer.
//!
//! Provides a schema-versioned store of independently named collections
//! (settings, users, knowledge bases, shared insights, chat histories) on
//! top of a single-writer `tokio-rusqlite` connection, and the typed
//! repositories that own each collection's invariants.

pub mod collections;
pub mod database;
pub mod locks;
pub mod migrations;
pub mod repos;
pub mod store;

pub use collections::{Collection, ReadOutcome};
pub use database::Database;
pub use locks::KeyedLocks;
pub use repos::{
    ChatHistoryRepository, KnowledgeBaseRepository, SettingsRepository, SharedInsightRepository,
    UserRepository,
};
pub use store::{Keyed, Store};
