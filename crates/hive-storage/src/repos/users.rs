// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User repository. Usernames are the primary key; identity is asserted,
//! there is no credential.

use std::sync::Arc;

use tracing::info;

use hive_core::HiveError;
use hive_core::types::User;

use crate::collections::Collection;
use crate::store::Store;

pub struct UserRepository {
    store: Arc<Store>,
}

impl UserRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Register a new username. The uniqueness check and the write are a
    /// single statement, so two racing registrations cannot both succeed.
    pub async fn register(&self, username: &str) -> Result<User, HiveError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(HiveError::Validation("username must not be empty".into()));
        }
        let user = User::new(username);
        if !self.store.insert(Collection::Users, username, &user).await? {
            return Err(HiveError::DuplicateUser(username.to_string()));
        }
        info!(user_id = %user.id, username, "user registered");
        Ok(user)
    }

    pub async fn login(&self, username: &str) -> Result<User, HiveError> {
        let username = username.trim();
        self.store
            .get(Collection::Users, username)
            .await
            .found()
            .ok_or_else(|| HiveError::UserNotFound(username.to_string()))
    }
}
