// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory backend for deterministic testing.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use decodebot_core::{
    BackendApi, BotError, JobStatus, NotificationJob, ReferralRequest, ReferralResponse,
    Registration, UserProfile, UserStats,
};
use tokio::sync::Mutex;

/// Scripted [`BackendApi`].
///
/// Each `fetch_pending` call pops the next queued batch (empty once the
/// script runs out). Status reports, registrations and referrals are
/// recorded in call order.
#[derive(Clone, Default)]
pub struct MockBackend {
    batches: Arc<Mutex<VecDeque<Vec<NotificationJob>>>>,
    status_updates: Arc<Mutex<Vec<(u64, JobStatus)>>>,
    failing_status_updates: Arc<Mutex<HashSet<u64>>>,
    registrations: Arc<Mutex<Vec<Registration>>>,
    referrals: Arc<Mutex<Vec<ReferralRequest>>>,
    fetch_limits: Arc<Mutex<Vec<usize>>>,
    stats: Arc<Mutex<Option<UserStats>>>,
    schedule_calls: Arc<AtomicUsize>,
    health_calls: Arc<AtomicUsize>,
    fail_fetch: Arc<AtomicBool>,
    fail_schedule: Arc<AtomicBool>,
    fail_register: Arc<AtomicBool>,
    unhealthy: Arc<AtomicBool>,
}

fn unavailable() -> BotError {
    BotError::Backend {
        status: 503,
        body: "service unavailable".into(),
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one batch for a future `fetch_pending`.
    pub async fn push_batch(&self, jobs: Vec<NotificationJob>) {
        self.batches.lock().await.push_back(jobs);
    }

    pub fn fail_fetch(&self) {
        self.fail_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_schedule(&self) {
        self.fail_schedule.store(true, Ordering::SeqCst);
    }

    pub fn fail_register(&self) {
        self.fail_register.store(true, Ordering::SeqCst);
    }

    /// Every later health check fails.
    pub fn set_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }

    /// Status reports for `job_id` fail.
    pub async fn fail_status_update_for(&self, job_id: u64) {
        self.failing_status_updates.lock().await.insert(job_id);
    }

    pub async fn set_stats(&self, stats: UserStats) {
        *self.stats.lock().await = Some(stats);
    }

    /// Every status report attempt, in call order, including failed ones.
    pub async fn status_updates(&self) -> Vec<(u64, JobStatus)> {
        self.status_updates.lock().await.clone()
    }

    pub async fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().await.clone()
    }

    pub async fn referrals(&self) -> Vec<ReferralRequest> {
        self.referrals.lock().await.clone()
    }

    pub async fn fetch_limits(&self) -> Vec<usize> {
        self.fetch_limits.lock().await.clone()
    }

    pub fn schedule_calls(&self) -> usize {
        self.schedule_calls.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn health_check(&self) -> Result<(), BotError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn register_user(&self, registration: &Registration) -> Result<(), BotError> {
        self.registrations.lock().await.push(registration.clone());
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn get_user_profile(&self, telegram_id: i64) -> Result<UserProfile, BotError> {
        Ok(UserProfile {
            telegram_id,
            ..Default::default()
        })
    }

    async fn process_referral(
        &self,
        referrer_id: i64,
        referred_id: i64,
    ) -> Result<ReferralResponse, BotError> {
        self.referrals.lock().await.push(ReferralRequest {
            referrer_id,
            referred_id,
        });
        Ok(ReferralResponse {
            success: true,
            shards_awarded: 20,
            message: "Referral processed".into(),
        })
    }

    async fn schedule_notifications(&self) -> Result<(), BotError> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_schedule.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn fetch_pending(&self, limit: usize) -> Result<Vec<NotificationJob>, BotError> {
        self.fetch_limits.lock().await.push(limit);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut batch = self.batches.lock().await.pop_front().unwrap_or_default();
        batch.truncate(limit);
        Ok(batch)
    }

    async fn update_job_status(&self, job_id: u64, status: JobStatus) -> Result<(), BotError> {
        self.status_updates.lock().await.push((job_id, status));
        if self.failing_status_updates.lock().await.contains(&job_id) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn get_user_stats(&self) -> Result<UserStats, BotError> {
        self.stats.lock().await.ok_or_else(unavailable)
    }
}
