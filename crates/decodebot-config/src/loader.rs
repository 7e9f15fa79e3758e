// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/decodebot/decodebot.toml` < `~/.config/decodebot/decodebot.toml`
//! < `./decodebot.toml`, then the bot's historical environment variables
//! (`BOT_TOKEN`, `SERVER_URL`, ...) and finally `DECODEBOT_*` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};

use crate::model::DecodebotConfig;

/// Top-level sections recognized in `DECODEBOT_<SECTION>_<KEY>` variables.
const SECTIONS: &[&str] = &["bot", "telegram", "backend", "webhook", "scheduler", "messages"];

/// Environment variables the bot has always read, and the keys they set.
pub const LEGACY_ENV: &[(&str, &str)] = &[
    ("BOT_TOKEN", "telegram.bot_token"),
    ("BOT_USERNAME", "telegram.bot_username"),
    ("MINI_APP_URL", "telegram.mini_app_url"),
    ("BOT_SECRET", "backend.bot_secret"),
    ("SERVER_URL", "backend.url"),
    ("BOT_ADMIN_ID", "bot.admin_id"),
    ("DEBUG", "bot.debug"),
    ("WEBHOOK_PORT", "webhook.port"),
];

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<DecodebotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<DecodebotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DecodebotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DecodebotConfig, figment::Error> {
    let figment = Figment::new()
        .merge(Serialized::defaults(DecodebotConfig::default()))
        .merge(Toml::file(path));
    merge_legacy_env(figment).merge(env_provider()).extract()
}

/// Build the Figment used for standard config loading.
pub fn build_figment() -> Figment {
    let figment = Figment::new()
        .merge(Serialized::defaults(DecodebotConfig::default()))
        .merge(Toml::file("/etc/decodebot/decodebot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("decodebot/decodebot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("decodebot.toml"));
    merge_legacy_env(figment).merge(env_provider())
}

/// Maps a `DECODEBOT_`-stripped env key to a dotted config path.
///
/// Only the first `<section>_` is turned into a dot so keys containing
/// underscores survive: `telegram_bot_token` -> `telegram.bot_token`.
pub fn map_env_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = lower.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    lower
}

/// Converts a historical env var value into the value its key expects.
///
/// Blank values are treated as unset. `DEBUG` is on only when it is exactly
/// `true`; numeric keys that do not parse are dropped with a warning so the
/// default applies.
pub fn legacy_value(name: &str, raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match name {
        "DEBUG" => Some(Value::from(raw == "true")),
        "BOT_ADMIN_ID" => parse_or_warn::<i64>(name, raw).map(Value::from),
        "WEBHOOK_PORT" => parse_or_warn::<u16>(name, raw).map(Value::from),
        _ => Some(Value::from(raw)),
    }
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, raw: &str) -> Option<T> {
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::warn!(var = name, value = raw, "ignoring unparseable environment variable");
    }
    parsed
}

fn env_provider() -> Env {
    Env::prefixed("DECODEBOT_").map(|key| map_env_key(key.as_str()).into())
}

fn merge_legacy_env(figment: Figment) -> Figment {
    LEGACY_ENV
        .iter()
        .filter_map(|(name, path)| {
            let raw = std::env::var(name).ok()?;
            legacy_value(name, &raw).map(|value| (*path, value))
        })
        .fold(figment, |figment, (path, value)| {
            figment.merge(Serialized::default(path, value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_keys_split_on_first_section_only() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(map_env_key("BACKEND_RETRY_MAX_DELAY_MS"), "backend.retry_max_delay_ms");
        assert_eq!(map_env_key("bot_admin_id"), "bot.admin_id");
        assert_eq!(map_env_key("scheduler_batch_size"), "scheduler.batch_size");
    }

    #[test]
    fn unknown_sections_pass_through() {
        assert_eq!(map_env_key("nonsense_key"), "nonsense_key");
    }

    #[test]
    fn debug_is_on_only_for_true() {
        assert_eq!(legacy_value("DEBUG", "true"), Some(Value::from(true)));
        assert_eq!(legacy_value("DEBUG", "1"), Some(Value::from(false)));
        assert_eq!(legacy_value("DEBUG", "yes"), Some(Value::from(false)));
    }

    #[test]
    fn blank_legacy_values_are_unset() {
        assert_eq!(legacy_value("BOT_ADMIN_ID", ""), None);
        assert_eq!(legacy_value("WEBHOOK_PORT", "  "), None);
        assert_eq!(legacy_value("BOT_TOKEN", ""), None);
    }

    #[test]
    fn numeric_legacy_values_parse_or_drop() {
        assert_eq!(legacy_value("BOT_ADMIN_ID", "42"), Some(Value::from(42i64)));
        assert_eq!(legacy_value("WEBHOOK_PORT", "9090"), Some(Value::from(9090u16)));
        assert_eq!(legacy_value("WEBHOOK_PORT", "http"), None);
    }
}
