// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named collections and the outcome type for reads against them.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A named collection in the store. Each maps to one key/value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    /// Application settings keyed by setting name (e.g. `apiKey`).
    Settings,
    /// Registered users keyed by username.
    Users,
    /// Knowledge bases keyed by id.
    KnowledgeBases,
    /// Shared insights keyed by id.
    SharedInsights,
    /// Per-user chat history keyed by user id.
    ChatHistory,
}

impl Collection {
    /// Name of the backing table. Only ever one of the fixed names above,
    /// so it is safe to splice into SQL.
    pub fn table(self) -> &'static str {
        self.into()
    }

    /// Schema version that introduced this collection.
    pub fn since_version(self) -> u32 {
        match self {
            Collection::Settings | Collection::Users | Collection::KnowledgeBases => 1,
            Collection::SharedInsights | Collection::ChatHistory => 2,
        }
    }
}

/// Result of a read against the store.
///
/// Read failures never propagate as errors. A failed or undecodable read is
/// `Degraded` and callers treat it like `Absent`; the reason has already been
/// logged at `warn` by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    Found(T),
    Absent,
    Degraded { reason: String },
}

impl<T> ReadOutcome<T> {
    /// The value, if one was found.
    pub fn found(self) -> Option<T> {
        match self {
            ReadOutcome::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ReadOutcome::Found(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ReadOutcome::Absent)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ReadOutcome::Degraded { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadOutcome<U> {
        match self {
            ReadOutcome::Found(v) => ReadOutcome::Found(f(v)),
            ReadOutcome::Absent => ReadOutcome::Absent,
            ReadOutcome::Degraded { reason } => ReadOutcome::Degraded { reason },
        }
    }
}

impl<T: Default> ReadOutcome<T> {
    /// The value, or `T::default()` when absent or degraded.
    pub fn or_empty(self) -> T {
        self.found().unwrap_or_default()
    }
}
