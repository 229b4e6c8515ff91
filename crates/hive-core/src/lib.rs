// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hive knowledge layer.
//!
//! This crate provides the domain types persisted by the store (users,
//! knowledge bases, chat messages, shared insights), the request/response
//! contract spoken with the language-model backend, the shared error type,
//! and the adapter traits implemented by the storage and backend crates.

pub mod contract;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HiveError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{ModelBackend, PluginAdapter};
