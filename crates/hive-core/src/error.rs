// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hive knowledge layer.

use thiserror::Error;

/// The primary error type used across all Hive crates.
///
/// Read failures in the store are deliberately absent from this enum: they
/// resolve to a degraded read outcome instead of propagating (see
/// `hive_storage::ReadOutcome`).
#[derive(Debug, Error)]
pub enum HiveError {
    /// Configuration errors (invalid TOML, missing API key, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The store could not be opened or migrated. Fatal at startup.
    #[error("failed to open store: {source}")]
    StoreOpen {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A store write (put/delete) failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Registration with a username that already exists.
    #[error("user `{0}` already exists")]
    DuplicateUser(String),

    /// Login with a username that was never registered.
    #[error("user `{0}` not found")]
    UserNotFound(String),

    /// A referenced entity (knowledge base, file, message) does not exist.
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    /// An uploaded or attached file exceeds its size ceiling.
    #[error("file `{name}` is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// Input rejected before reaching the store or the backend.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A generation is already outstanding for this conversation.
    #[error("a response is already being generated for this conversation")]
    GenerationInFlight,

    /// The model backend call failed.
    #[error("{message}")]
    Backend {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HiveError {
    /// Shorthand for a backend failure without an underlying source error.
    pub fn backend(message: impl Into<String>) -> Self {
        HiveError::Backend {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        HiveError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
