// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express. All violations are collected;
//! validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::HiveConfig;

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &HiveConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if config.gemini.base_url.trim().is_empty() {
        errors.push(ConfigError::validation("gemini.base_url must not be empty"));
    }

    let models = &config.models;
    for (key, model) in [
        ("models.fast_model", &models.fast_model),
        ("models.reasoning_model", &models.reasoning_model),
    ] {
        if model.trim().is_empty() {
            errors.push(ConfigError::validation(format!("{key} must not be empty")));
        }
    }

    for (key, temperature) in [
        ("models.fast_temperature", models.fast_temperature),
        ("models.reasoning_temperature", models.reasoning_temperature),
    ] {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            errors.push(ConfigError::validation(format!(
                "{key} must be between 0.0 and 2.0, got {temperature}"
            )));
        }
    }

    if models.fast_temperature >= models.reasoning_temperature {
        errors.push(ConfigError::validation(format!(
            "models.fast_temperature ({}) must be lower than models.reasoning_temperature ({})",
            models.fast_temperature, models.reasoning_temperature
        )));
    }

    if config.context.insight_window == 0 {
        errors.push(ConfigError::validation(
            "context.insight_window must be at least 1",
        ));
    }

    if config.context.answer_excerpt_chars == 0 {
        errors.push(ConfigError::validation(
            "context.answer_excerpt_chars must be at least 1",
        ));
    }

    if config.uploads.max_file_bytes == 0 {
        errors.push(ConfigError::validation(
            "uploads.max_file_bytes must be greater than 0",
        ));
    }

    if config.uploads.max_attachment_bytes == 0 {
        errors.push(ConfigError::validation(
            "uploads.max_attachment_bytes must be greater than 0",
        ));
    }

    if let Some(max) = config.insights.max_retained {
        if max < config.context.insight_window {
            errors.push(ConfigError::validation(format!(
                "insights.max_retained ({max}) must be at least context.insight_window ({})",
                config.context.insight_window
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&HiveConfig::default()).is_ok());
    }

    #[test]
    fn equal_tier_temperatures_are_rejected() {
        let mut config = HiveConfig::default();
        config.models.fast_temperature = 0.5;
        config.models.reasoning_temperature = 0.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("fast_temperature")));
    }

    #[test]
    fn collects_every_violation() {
        let mut config = HiveConfig::default();
        config.storage.database_path = " ".into();
        config.context.insight_window = 0;
        config.uploads.max_file_bytes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn retention_smaller_than_window_is_rejected() {
        let mut config = HiveConfig::default();
        config.insights.max_retained = Some(5);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("max_retained"));
    }
}
