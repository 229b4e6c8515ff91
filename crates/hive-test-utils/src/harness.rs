// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness: a temp SQLite database and a fully wired `HiveApp` over a
//! [`MockBackend`].

use std::sync::Arc;

use hive_agent::HiveApp;
use hive_config::HiveConfig;
use hive_core::HiveError;

use crate::mock_backend::{MockBackend, MockReply};

/// Builder for test environments.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    gated: bool,
    config: HiveConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            gated: false,
            config: HiveConfig::default(),
        }
    }

    pub fn with_replies(mut self, replies: Vec<MockReply>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_texts<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_replies(texts.into_iter().map(|t| MockReply::Text(t.into())).collect())
    }

    /// Hold backend calls until `harness.backend.release()`.
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    /// Adjust the config. The database path is always overridden.
    pub fn with_config(mut self, f: impl FnOnce(&mut HiveConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub async fn build(self) -> Result<TestHarness, HiveError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| HiveError::StoreOpen {
            source: Box::new(e),
        })?;
        let mut config = self.config;
        config.storage.database_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();

        let mut backend = MockBackend::with_replies(self.replies);
        if self.gated {
            backend = backend.gated();
        }
        let backend = Arc::new(backend);
        let app = HiveApp::open(config, backend.clone()).await?;

        Ok(TestHarness {
            app,
            backend,
            _temp_dir: temp_dir,
        })
    }
}

/// A wired application over a temp database.
pub struct TestHarness {
    pub app: HiveApp,
    pub backend: Arc<MockBackend>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Default harness with an unscripted backend.
    pub async fn new() -> Result<Self, HiveError> {
        Self::builder().build().await
    }

    /// Register a user and create a knowledge base, returning their ids.
    pub async fn user_and_kb(&self, username: &str, kb_name: &str) -> Result<(String, String), HiveError> {
        let user = self.app.register(username).await?;
        let kb = self.app.create_knowledge_base(kb_name).await?;
        Ok((user.id, kb.id))
    }
}
