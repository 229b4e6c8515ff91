// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model backend trait for language-model integrations.

use async_trait::async_trait;

use crate::error::HiveError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{GenerateRequest, GenerateResponse};

/// Adapter for the language-model backend.
///
/// Only the request/response contract is consumed by the knowledge layer;
/// transport details belong to the implementing crate.
#[async_trait]
pub trait ModelBackend: PluginAdapter {
    /// Sends one generation request and returns the full reply.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, HiveError>;
}
