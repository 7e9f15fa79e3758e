// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game backend trait.

use async_trait::async_trait;

use crate::error::BotError;
use crate::types::{
    JobStatus, NotificationJob, ReferralResponse, Registration, UserProfile, UserStats,
};

/// Operations the bot performs against the DEC0D3 game backend.
///
/// Implementations own their own retry behavior. Every method maps a
/// non-success response to [`BotError::Backend`].
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Single unauthenticated liveness probe.
    async fn health_check(&self) -> Result<(), BotError>;

    /// Registers (or refreshes) a Telegram user.
    async fn register_user(&self, registration: &Registration) -> Result<(), BotError>;

    /// Fetches one player's profile.
    async fn get_user_profile(&self, telegram_id: i64) -> Result<UserProfile, BotError>;

    /// Credits a referral. The backend's verdict is returned even on
    /// non-success status codes.
    async fn process_referral(
        &self,
        referrer_id: i64,
        referred_id: i64,
    ) -> Result<ReferralResponse, BotError>;

    /// Asks the backend to enqueue the next round of daily notifications.
    async fn schedule_notifications(&self) -> Result<(), BotError>;

    /// Pulls up to `limit` pending jobs, in backend order.
    async fn fetch_pending(&self, limit: usize) -> Result<Vec<NotificationJob>, BotError>;

    /// Reports the terminal status of a job.
    async fn update_job_status(&self, job_id: u64, status: JobStatus) -> Result<(), BotError>;

    /// Aggregate player statistics.
    async fn get_user_stats(&self) -> Result<UserStats, BotError>;
}
