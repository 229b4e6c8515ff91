// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user chat history.
//!
//! One value per user id holding every conversation that user has, keyed by
//! knowledge base id. The mapping is always read and written whole.

use std::sync::Arc;

use tracing::debug;

use hive_core::HiveError;
use hive_core::types::{ChatHistory, ChatMessage, Feedback};

use crate::collections::Collection;
use crate::locks::KeyedLocks;
use crate::store::Store;

pub struct ChatHistoryRepository {
    store: Arc<Store>,
    locks: KeyedLocks,
}

impl ChatHistoryRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
        }
    }

    /// The user's full mapping. Empty when nothing was stored or the read failed.
    pub async fn get(&self, user_id: &str) -> ChatHistory {
        self.store.get(Collection::ChatHistory, user_id).await.or_empty()
    }

    /// One conversation, oldest message first.
    pub async fn conversation(&self, user_id: &str, kb_id: &str) -> Vec<ChatMessage> {
        self.get(user_id).await.remove(kb_id).unwrap_or_default()
    }

    /// Replace the user's full mapping.
    pub async fn save(&self, user_id: &str, history: &ChatHistory) -> Result<(), HiveError> {
        self.store.put(Collection::ChatHistory, user_id, history).await
    }

    /// Load, modify and save the mapping under the user's lock.
    ///
    /// Nothing is written when `f` returns an error.
    pub async fn update<F, R>(&self, user_id: &str, f: F) -> Result<R, HiveError>
    where
        F: FnOnce(&mut ChatHistory) -> Result<R, HiveError>,
    {
        let _guard = self.locks.lock(user_id).await;
        let mut history = self.get(user_id).await;
        let out = f(&mut history)?;
        self.save(user_id, &history).await?;
        Ok(out)
    }

    /// Append messages to the end of one conversation.
    pub async fn append(
        &self,
        user_id: &str,
        kb_id: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<(), HiveError> {
        let count = messages.len();
        self.update(user_id, |history| {
            history.entry(kb_id.to_string()).or_default().extend(messages);
            Ok(())
        })
        .await?;
        debug!(user_id, kb_id, count, "messages appended");
        Ok(())
    }

    /// Set the feedback tag on one message and return the conversation as it
    /// now stands.
    pub async fn set_feedback(
        &self,
        user_id: &str,
        kb_id: &str,
        message_id: &str,
        tag: Feedback,
    ) -> Result<Vec<ChatMessage>, HiveError> {
        self.update(user_id, |history| {
            let conversation = history
                .get_mut(kb_id)
                .ok_or_else(|| HiveError::not_found("message", message_id))?;
            let message = conversation
                .iter_mut()
                .find(|m| m.id == message_id)
                .ok_or_else(|| HiveError::not_found("message", message_id))?;
            message.feedback = Some(tag);
            Ok(conversation.clone())
        })
        .await
    }
}
