// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One poll-and-deliver pass over the backend's pending notification queue.

use std::sync::Arc;

use decodebot_core::{
    BackendApi, JobKind, JobStatus, MessageTransport, NotificationJob, OutboundMessage,
};
use decodebot_messages::{MessageResolver, main_menu};
use tracing::{debug, info, warn};

/// Default number of jobs pulled per cycle.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Counters for a cycle that fetched at least one job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub sent: usize,
    /// Jobs reported `FAILED`, including those without a user.
    pub failed: usize,
    pub skipped_without_user: usize,
    /// Status reports the backend did not accept.
    pub report_errors: usize,
}

/// How a dispatcher cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The pending batch could not be fetched; nothing was processed.
    FetchFailed,
    /// The queue was empty.
    Empty,
    Processed(CycleReport),
}

/// Drains pending notification jobs and delivers them.
pub struct NotificationDispatcher {
    backend: Arc<dyn BackendApi>,
    transport: Arc<dyn MessageTransport>,
    resolver: Arc<MessageResolver>,
    mini_app_url: String,
    batch_size: usize,
}

impl NotificationDispatcher {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        transport: Arc<dyn MessageTransport>,
        resolver: Arc<MessageResolver>,
        mini_app_url: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            transport,
            resolver,
            mini_app_url: mini_app_url.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn backend(&self) -> &Arc<dyn BackendApi> {
        &self.backend
    }

    /// Runs one cycle: fetch a batch, then deliver and report each job in
    /// the order the backend returned them.
    ///
    /// Every fetched job gets exactly one status report. Failures are
    /// contained to the job they happen on.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let jobs = match self.backend.fetch_pending(self.batch_size).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!(error = %e, "failed to fetch pending notifications");
                return CycleOutcome::FetchFailed;
            }
        };

        if jobs.is_empty() {
            debug!("notification queue empty");
            return CycleOutcome::Empty;
        }

        info!(count = jobs.len(), "processing notification jobs");

        let mut report = CycleReport {
            fetched: jobs.len(),
            ..Default::default()
        };

        for job in &jobs {
            let status = self.deliver(job, &mut report).await;
            match status {
                JobStatus::Sent => report.sent += 1,
                _ => report.failed += 1,
            }

            if let Err(e) = self.backend.update_job_status(job.id, status).await {
                report.report_errors += 1;
                warn!(job_id = job.id, status = %status, error = %e, "failed to report job status");
            }
        }

        info!(
            fetched = report.fetched,
            sent = report.sent,
            failed = report.failed,
            report_errors = report.report_errors,
            "notification cycle finished"
        );

        CycleOutcome::Processed(report)
    }

    /// Attempts delivery of one job and returns the status to report.
    async fn deliver(&self, job: &NotificationJob, report: &mut CycleReport) -> JobStatus {
        let Some(user) = &job.user else {
            warn!(job_id = job.id, "job has no user data, marking failed");
            report.skipped_without_user += 1;
            return JobStatus::Failed;
        };

        let streak = match job.kind {
            JobKind::DailyChallenge => user.best_streak(),
            JobKind::Other(ref kind) => {
                debug!(job_id = job.id, kind = %kind, "unknown job type, sending plain reminder");
                0
            }
        };

        let text = self
            .resolver
            .daily_reminder(&user.first_name, i64::from(streak));
        let msg =
            OutboundMessage::text(user.telegram_id, text).with_menu(main_menu(&self.mini_app_url));

        match self.transport.send(msg).await {
            Ok(()) => {
                info!(
                    job_id = job.id,
                    telegram_id = user.telegram_id,
                    username = %user.username,
                    streak,
                    "notification sent"
                );
                JobStatus::Sent
            }
            Err(e) => {
                warn!(
                    job_id = job.id,
                    telegram_id = user.telegram_id,
                    transport = self.transport.name(),
                    error = %e,
                    "notification delivery failed"
                );
                JobStatus::Failed
            }
        }
    }
}
