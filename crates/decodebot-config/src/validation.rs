// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::DecodebotConfig;

/// Largest batch the backend accepts for `notifications/pending`.
pub const MAX_BATCH_SIZE: usize = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &DecodebotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match config.telegram.bot_token.as_deref().map(str::trim) {
        None | Some("") => errors.push(ConfigError::MissingKey {
            key: "telegram.bot_token".to_string(),
        }),
        Some(_) => {}
    }

    if let Err(reason) = check_http_url(&config.backend.url) {
        errors.push(ConfigError::Validation {
            message: format!("backend.url `{}` {reason}", config.backend.url),
        });
    }

    if let Err(reason) = check_http_url(&config.telegram.mini_app_url) {
        errors.push(ConfigError::Validation {
            message: format!(
                "telegram.mini_app_url `{}` {reason}",
                config.telegram.mini_app_url
            ),
        });
    }

    if config.scheduler.process_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.process_interval_secs must be greater than 0".to_string(),
        });
    }

    if config.scheduler.schedule_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.schedule_interval_secs must be greater than 0".to_string(),
        });
    }

    if !(1..=MAX_BATCH_SIZE).contains(&config.scheduler.batch_size) {
        errors.push(ConfigError::Validation {
            message: format!(
                "scheduler.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                config.scheduler.batch_size
            ),
        });
    }

    if config.backend.retry_base_delay_ms > config.backend.retry_max_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "backend.retry_base_delay_ms ({}) must not exceed backend.retry_max_delay_ms ({})",
                config.backend.retry_base_delay_ms, config.backend.retry_max_delay_ms
            ),
        });
    }

    if config.backend.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.webhook.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "webhook.host must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Accepts `http://` and `https://` URLs with a non-empty host.
fn check_http_url(url: &str) -> Result<(), &'static str> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or("must start with http:// or https://")?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.starts_with(':') || host.contains(char::is_whitespace) {
        return Err("has no valid host");
    }
    Ok(())
}
