// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! At most one outstanding generation per (user, knowledge base) conversation.

use std::sync::Arc;

use dashmap::DashSet;

type ConversationKey = (String, String);

/// Registry of conversations with a generation in flight.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<DashSet<ConversationKey>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the conversation. `None` when a generation is already running;
    /// the caller must reject rather than queue.
    pub fn try_acquire(&self, user_id: &str, kb_id: &str) -> Option<InFlightGuard> {
        let key = (user_id.to_string(), kb_id.to_string());
        if !self.active.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn is_active(&self, user_id: &str, kb_id: &str) -> bool {
        self.active
            .contains(&(user_id.to_string(), kb_id.to_string()))
    }
}

/// Releases the conversation when dropped, on success, error or panic.
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<DashSet<ConversationKey>>,
    key: ConversationKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_release() {
        let inflight = InFlight::new();
        let guard = inflight.try_acquire("u", "kb").unwrap();
        assert!(inflight.try_acquire("u", "kb").is_none());
        assert!(inflight.is_active("u", "kb"));
        drop(guard);
        assert!(inflight.try_acquire("u", "kb").is_some());
    }

    #[test]
    fn conversations_are_independent() {
        let inflight = InFlight::new();
        let _a = inflight.try_acquire("u", "kb1").unwrap();
        assert!(inflight.try_acquire("u", "kb2").is_some());
        assert!(inflight.try_acquire("v", "kb1").is_some());
    }
}
