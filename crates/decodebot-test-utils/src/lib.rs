// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for DEC0D3 bot tests.
//!
//! - [`MockBackend`] - in-memory [`decodebot_core::BackendApi`] with a
//!   scripted job queue and recorded calls
//! - [`MockTransport`] - [`decodebot_core::MessageTransport`] that captures
//!   sends and can be told to fail

pub mod mock_backend;
pub mod mock_transport;

pub use mock_backend::MockBackend;
pub use mock_transport::MockTransport;

use decodebot_core::{JobKind, JobStatus, NotificationJob, UserIdentity};

/// A pending job for `telegram_id` with the given kind and streak.
pub fn job_for(id: u64, telegram_id: i64, kind: JobKind, streak: i32) -> NotificationJob {
    NotificationJob {
        id,
        user_id: id,
        kind,
        scheduled_at: None,
        status: JobStatus::Pending,
        user: Some(UserIdentity {
            telegram_id,
            first_name: format!("user{telegram_id}"),
            all_streak: streak,
            ..Default::default()
        }),
    }
}

/// A pending job whose user snapshot is missing.
pub fn orphan_job(id: u64) -> NotificationJob {
    NotificationJob {
        id,
        user_id: id,
        kind: JobKind::DailyChallenge,
        scheduled_at: None,
        status: JobStatus::Pending,
        user: None,
    }
}
