// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scalar application settings.

use std::sync::Arc;

use hive_core::HiveError;

use crate::collections::Collection;
use crate::store::Store;

/// Key under which the backend API credential is stored.
pub const API_KEY: &str = "apiKey";

pub struct SettingsRepository {
    store: Arc<Store>,
}

impl SettingsRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.store.get(Collection::Settings, key).await.found()
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), HiveError> {
        self.store.put(Collection::Settings, key, value).await
    }

    pub async fn remove(&self, key: &str) -> Result<bool, HiveError> {
        self.store.delete(Collection::Settings, key).await
    }

    pub async fn api_key(&self) -> Option<String> {
        self.get(API_KEY).await.filter(|k| !k.is_empty())
    }

    pub async fn set_api_key(&self, key: &str) -> Result<(), HiveError> {
        self.set(API_KEY, key).await
    }
}
