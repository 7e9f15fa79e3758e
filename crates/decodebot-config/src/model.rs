// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the DEC0D3 bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level bot configuration.
///
/// Loaded from TOML files and environment variables. Every section is
/// optional and defaults to the values the bot ships with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecodebotConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Game backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Inbound webhook receiver settings.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Notification queue polling settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Message content settings.
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Telegram user ID allowed to run admin commands and receive the
    /// startup report. `None` disables both.
    #[serde(default)]
    pub admin_id: Option<i64>,

    /// Forces debug logging regardless of `log_level`.
    #[serde(default)]
    pub debug: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            admin_id: None,
            debug: false,
        }
    }
}

impl BotConfig {
    /// The level actually handed to the tracing filter.
    pub fn effective_log_level(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to start.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Bot username without `@`, accepted as a command suffix.
    #[serde(default)]
    pub bot_username: Option<String>,

    /// URL of the game's mini app opened by the main menu button.
    #[serde(default = "default_mini_app_url")]
    pub mini_app_url: String,

    /// Long-polling timeout passed to `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            bot_username: None,
            mini_app_url: default_mini_app_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("bot_username", &self.bot_username)
            .field("mini_app_url", &self.mini_app_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

fn default_mini_app_url() -> String {
    "https://ushpuras.dev/DEC0D3/".to_string()
}

fn default_poll_timeout_secs() -> u32 {
    60
}

/// Game backend connection configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend API.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Shared secret sent as `X-Bot-Secret` and expected on inbound webhooks.
    #[serde(default)]
    pub bot_secret: Option<String>,

    /// Per-attempt request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Additional attempts after the first one on transport errors and 5xx.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles per attempt.
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Upper bound on a single retry delay.
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// Health probes made at startup before giving up on the backend.
    #[serde(default = "default_startup_health_attempts")]
    pub startup_health_attempts: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            bot_secret: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            startup_health_attempts: default_startup_health_attempts(),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("bot_secret", &self.bot_secret.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("startup_health_attempts", &self.startup_health_attempts)
            .finish()
    }
}

impl BackendConfig {
    /// The shared secret, treating an empty string as unset.
    pub fn secret(&self) -> Option<&str> {
        self.bot_secret.as_deref().filter(|s| !s.is_empty())
    }
}

fn default_backend_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_retry_max_delay_ms() -> u64 {
    5000
}

fn default_startup_health_attempts() -> u32 {
    10
}

/// Inbound webhook receiver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    /// Whether the receiver is started at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Address to bind.
    #[serde(default = "default_webhook_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_webhook_port")]
    pub port: u16,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_webhook_host(),
            port: default_webhook_port(),
        }
    }
}

fn default_webhook_host() -> String {
    "0.0.0.0".to_string()
}

fn default_webhook_port() -> u16 {
    8082
}

/// Notification queue polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Whether the polling and scheduling timers run.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between queue drains.
    #[serde(default = "default_process_interval_secs")]
    pub process_interval_secs: u64,

    /// Seconds between schedule triggers.
    #[serde(default = "default_schedule_interval_secs")]
    pub schedule_interval_secs: u64,

    /// Jobs pulled per drain.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            process_interval_secs: default_process_interval_secs(),
            schedule_interval_secs: default_schedule_interval_secs(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_process_interval_secs() -> u64 {
    120
}

fn default_schedule_interval_secs() -> u64 {
    3600
}

fn default_batch_size() -> usize {
    20
}

/// Message content configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagesConfig {
    /// Fixed seed for template selection. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Shards quoted in the referral notification.
    #[serde(default = "default_referral_shards")]
    pub referral_shards: u32,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            seed: None,
            referral_shards: default_referral_shards(),
        }
    }
}

fn default_referral_shards() -> u32 {
    20
}

fn default_true() -> bool {
    true
}
