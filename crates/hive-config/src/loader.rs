// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hive.toml` > `~/.config/hive/hive.toml` > `/etc/hive/hive.toml`
//! with environment variable overrides via `HIVE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HiveConfig;

/// Sections addressable through `HIVE_<SECTION>_<KEY>` variables.
const ENV_SECTIONS: &[&str] = &[
    "app", "storage", "gemini", "models", "context", "uploads", "insights",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hive/hive.toml`
/// 3. `~/.config/hive/hive.toml`
/// 4. `./hive.toml`
/// 5. `HIVE_*` environment variables
pub fn load_config() -> Result<HiveConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<HiveConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HiveConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HiveConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HiveConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HiveConfig::default()))
        .merge(Toml::file("/etc/hive/hive.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hive/hive.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hive.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `HIVE_GEMINI_API_KEY` maps to `gemini.api_key`.
fn env_provider() -> Env {
    Env::prefixed("HIVE_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env key to its dotted config path.
///
/// Figment hands the key over in its original case (`GEMINI_API_KEY`), so
/// it is lowercased before the section match.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
