// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hive knowledge layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Hive configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HiveConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gemini backend connection settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Model tier identifiers and temperatures.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Context assembly settings.
    #[serde(default)]
    pub context: ContextConfig,

    /// Upload size ceilings.
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Shared insight retention.
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("hive").join("hive.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("hive.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Gemini backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the stored setting, then `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the generative language API.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient statuses (429/500/503).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    1
}

/// The two backend tiers. The fast tier runs cooler than the reasoning tier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    #[serde(default = "default_fast_temperature")]
    pub fast_temperature: f32,

    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,

    #[serde(default = "default_reasoning_temperature")]
    pub reasoning_temperature: f32,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            fast_model: default_fast_model(),
            fast_temperature: default_fast_temperature(),
            reasoning_model: default_reasoning_model(),
            reasoning_temperature: default_reasoning_temperature(),
        }
    }
}

fn default_fast_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_fast_temperature() -> f32 {
    0.3
}

fn default_reasoning_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_reasoning_temperature() -> f32 {
    0.7
}

/// Context assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Number of most recent shared insights injected into the system instruction.
    #[serde(default = "default_insight_window")]
    pub insight_window: usize,

    /// Maximum characters of the model answer kept in an insight.
    #[serde(default = "default_answer_excerpt_chars")]
    pub answer_excerpt_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            insight_window: default_insight_window(),
            answer_excerpt_chars: default_answer_excerpt_chars(),
        }
    }
}

fn default_insight_window() -> usize {
    10
}

fn default_answer_excerpt_chars() -> usize {
    200
}

/// Upload size ceilings, in bytes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadsConfig {
    /// Ceiling for files added to a knowledge base.
    #[serde(default = "default_upload_limit")]
    pub max_file_bytes: u64,

    /// Ceiling for ephemeral chat attachments.
    #[serde(default = "default_upload_limit")]
    pub max_attachment_bytes: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_upload_limit(),
            max_attachment_bytes: default_upload_limit(),
        }
    }
}

fn default_upload_limit() -> u64 {
    20 * 1024 * 1024
}

/// Shared insight retention. Unset means insights accumulate without bound.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InsightsConfig {
    #[serde(default)]
    pub max_retained: Option<usize>,
}
