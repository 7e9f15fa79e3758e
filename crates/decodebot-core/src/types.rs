// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire and domain types shared between the backend client, the dispatcher,
//! the webhook receiver and the Telegram adapter.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a notification job on the backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

/// Kind of a notification job.
///
/// Unknown kinds are kept verbatim so a newer backend never breaks decoding
/// of a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobKind {
    DailyChallenge,
    Other(String),
}

const DAILY_CHALLENGE: &str = "DAILY_CHALLENGE";

impl From<String> for JobKind {
    fn from(value: String) -> Self {
        if value == DAILY_CHALLENGE {
            JobKind::DailyChallenge
        } else {
            JobKind::Other(value)
        }
    }
}

impl From<JobKind> for String {
    fn from(kind: JobKind) -> Self {
        match kind {
            JobKind::DailyChallenge => DAILY_CHALLENGE.to_string(),
            JobKind::Other(other) => other,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::DailyChallenge => f.write_str(DAILY_CHALLENGE),
            JobKind::Other(other) => f.write_str(other),
        }
    }
}

/// A player as known to the backend. The bot only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub telegram_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub all_streak: i32,
    #[serde(default)]
    pub hex_streak: i32,
    #[serde(default)]
    pub word_streak: i32,
    #[serde(default)]
    pub numeric_streak: i32,
}

impl UserIdentity {
    /// Highest streak across all game variants, never below zero.
    pub fn best_streak(&self) -> u32 {
        [
            self.all_streak,
            self.hex_streak,
            self.word_streak,
            self.numeric_streak,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
        .max(0) as u32
    }
}

/// A unit of pending notification work pulled from the backend queue.
///
/// The nested `user` snapshot is authoritative for delivery. Any flat
/// `telegram_id` the backend may also send is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(rename = "type")]
    pub kind: JobKind,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

/// The subset of a Telegram sender forwarded to the backend on `/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub telegram_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Player profile returned by `GET /api/bot/stats/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub username: String,
    pub first_name: String,
    pub total_games_won: i64,
    pub current_streak: i32,
    pub shard_balance: i64,
    pub referral_count: i64,
    pub daily_streak: i32,
    pub last_played_at: String,
}

/// Body of `POST /api/bot/referral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRequest {
    pub referrer_id: i64,
    pub referred_id: i64,
}

/// Outcome of a referral credit on the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralResponse {
    pub success: bool,
    pub shards_awarded: i64,
    pub message: String,
}

/// Aggregate player statistics from `GET /api/bot/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total_users: u64,
    pub active_users_7d: u64,
}

/// How the transport should interpret the message text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// The primary call-to-action control: a single button opening the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainMenu {
    pub label: String,
    pub url: String,
}

/// A message addressed to one Telegram user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: i64,
    pub text: String,
    pub format: TextFormat,
    pub menu: Option<MainMenu>,
}

impl OutboundMessage {
    /// Plain text message without any controls.
    pub fn text(recipient: i64, text: impl Into<String>) -> Self {
        Self {
            recipient,
            text: text.into(),
            format: TextFormat::Plain,
            menu: None,
        }
    }

    /// Attaches the main menu control.
    pub fn with_menu(mut self, menu: MainMenu) -> Self {
        self.menu = Some(menu);
        self
    }

    /// Marks the text as HTML.
    pub fn html(mut self) -> Self {
        self.format = TextFormat::Html;
        self
    }
}
