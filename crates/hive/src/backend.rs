// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opens the store and wires the Gemini backend for a command.

use std::sync::Arc;

use async_trait::async_trait;
use hive_agent::HiveApp;
use hive_config::HiveConfig;
use hive_core::contract::{GenerateRequest, GenerateResponse};
use hive_core::{AdapterType, HealthStatus, HiveError, ModelBackend, PluginAdapter};
use hive_gemini::{GeminiBackend, resolve_api_key};
use hive_storage::{Database, SettingsRepository, Store};
use tracing::debug;

/// Whether a command talks to the model backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendNeed {
    Required,
    Unused,
}

/// Open the configured store and build an app over it.
///
/// With [`BackendNeed::Required`] a missing API key fails here, before any
/// turn is written. Otherwise commands run against [`Unconfigured`].
pub async fn open_app(config: HiveConfig, need: BackendNeed) -> Result<HiveApp, HiveError> {
    let store = Arc::new(Store::new(Database::open_config(&config.storage).await?));

    let backend: Arc<dyn ModelBackend> = match need {
        BackendNeed::Required => {
            let stored = SettingsRepository::new(store.clone()).api_key().await;
            let key = resolve_api_key(config.gemini.api_key.as_deref(), stored.as_deref())?;
            Arc::new(GeminiBackend::new(&config.gemini, &key)?)
        }
        BackendNeed::Unused => {
            debug!("backend not needed for this command");
            Arc::new(Unconfigured)
        }
    };

    Ok(HiveApp::with_store(config, store, backend))
}

/// Stand-in backend for commands that never generate.
pub struct Unconfigured;

#[async_trait]
impl PluginAdapter for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Backend
    }

    async fn health_check(&self) -> Result<HealthStatus, HiveError> {
        Ok(HealthStatus::Degraded("no backend configured".into()))
    }

    async fn shutdown(&self) -> Result<(), HiveError> {
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for Unconfigured {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, HiveError> {
        Err(HiveError::backend("no model backend is configured"))
    }
}
