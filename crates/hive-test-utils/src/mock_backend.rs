// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model backend for deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify, Semaphore};

use hive_core::contract::{GenerateRequest, GenerateResponse};
use hive_core::{AdapterType, HealthStatus, HiveError, ModelBackend, PluginAdapter};

/// One scripted backend outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Response(GenerateResponse),
    Fail(String),
}

/// A backend that pops replies from a FIFO queue.
///
/// When the queue is empty it answers "mock response". A gated backend
/// parks every call until [`MockBackend::release`] is called, which keeps a
/// generation in flight for as long as a test needs.
pub struct MockBackend {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<GenerateRequest>>,
    calls: AtomicUsize,
    started: Notify,
    gate: Option<Arc<Semaphore>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            gate: None,
        }
    }

    /// Plain text replies, in order.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(texts.into_iter().map(|t| MockReply::Text(t.into())).collect())
    }

    /// Hold every call until released.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let one parked call finish.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Wait until a call has reached the backend.
    pub async fn wait_for_call(&self) {
        self.started.notified().await;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().await.last().cloned()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, HiveError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HiveError> {
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, HiveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| HiveError::Internal(e.to_string()))?;
            permit.forget();
        }

        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(GenerateResponse::from_text(text)),
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(HiveError::backend(message)),
            None => Ok(GenerateResponse::from_text("mock response")),
        }
    }
}
