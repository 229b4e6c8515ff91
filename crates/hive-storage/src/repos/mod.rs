// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed repositories over the collection store. Each owns one collection.

pub mod chat_history;
pub mod insights;
pub mod knowledge_bases;
pub mod settings;
pub mod users;

pub use chat_history::ChatHistoryRepository;
pub use insights::SharedInsightRepository;
pub use knowledge_bases::KnowledgeBaseRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;
