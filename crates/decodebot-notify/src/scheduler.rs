// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-interval timers driving the dispatcher.
//!
//! Two independent timers: the processing tick drains the queue, the
//! schedule tick asks the backend to enqueue the next round of jobs.
//! Neither fires immediately on start.

use std::sync::Arc;
use std::time::Duration;

use decodebot_config::model::SchedulerConfig;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatcher::{CycleOutcome, NotificationDispatcher};

/// Owns the processing and schedule timers.
pub struct NotificationScheduler {
    dispatcher: Arc<NotificationDispatcher>,
    process_every: Duration,
    schedule_every: Duration,
}

/// Running timer tasks. Both stop once the cancellation token fires.
pub struct SchedulerHandle {
    process: JoinHandle<()>,
    schedule: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Waits for both timer tasks to exit.
    pub async fn join(self) {
        if let Err(e) = self.process.await {
            warn!(error = %e, "notification processing task panicked");
        }
        if let Err(e) = self.schedule.await {
            warn!(error = %e, "notification schedule task panicked");
        }
    }
}

impl NotificationScheduler {
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        process_every: Duration,
        schedule_every: Duration,
    ) -> Self {
        Self {
            dispatcher,
            process_every,
            schedule_every,
        }
    }

    pub fn from_config(dispatcher: Arc<NotificationDispatcher>, config: &SchedulerConfig) -> Self {
        Self::new(
            dispatcher,
            Duration::from_secs(config.process_interval_secs),
            Duration::from_secs(config.schedule_interval_secs),
        )
    }

    /// Spawns both timers on the current runtime.
    ///
    /// A tick that overruns its period delays the next one instead of
    /// bursting, so cycles never overlap.
    pub fn start(&self, cancel: CancellationToken) -> SchedulerHandle {
        let process = {
            let dispatcher = Arc::clone(&self.dispatcher);
            let cancel = cancel.clone();
            let every = self.process_every;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(every);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if let CycleOutcome::Processed(report) = dispatcher.run_cycle().await {
                                debug!(?report, "processing tick complete");
                            }
                        }
                        _ = cancel.cancelled() => {
                            info!("notification processing task shutting down");
                            break;
                        }
                    }
                }
            })
        };

        let schedule = {
            let dispatcher = Arc::clone(&self.dispatcher);
            let every = self.schedule_every;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(every);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            match dispatcher.backend().schedule_notifications().await {
                                Ok(()) => debug!("backend notification scheduling triggered"),
                                Err(e) => warn!(error = %e, "failed to trigger notification scheduling"),
                            }
                        }
                        _ = cancel.cancelled() => {
                            info!("notification schedule task shutting down");
                            break;
                        }
                    }
                }
            })
        };

        info!(
            process_every_secs = self.process_every.as_secs(),
            schedule_every_secs = self.schedule_every.as_secs(),
            "notification scheduler started"
        );

        SchedulerHandle { process, schedule }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decodebot_core::JobKind;
    use decodebot_messages::MessageResolver;
    use decodebot_test_utils::{MockBackend, MockTransport, job_for};

    fn scheduler(backend: &MockBackend, transport: &MockTransport) -> NotificationScheduler {
        let dispatcher = NotificationDispatcher::new(
            Arc::new(backend.clone()),
            Arc::new(transport.clone()),
            Arc::new(MessageResolver::with_seed(3)),
            "https://example.com/",
        );
        NotificationScheduler::new(
            Arc::new(dispatcher),
            Duration::from_secs(120),
            Duration::from_secs(3600),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn processing_tick_runs_on_interval_only() {
        let backend = MockBackend::new();
        backend
            .push_batch(vec![job_for(1, 100, JobKind::DailyChallenge, 2)])
            .await;
        let transport = MockTransport::new();
        let cancel = CancellationToken::new();

        let handle = scheduler(&backend, &transport).start(cancel.clone());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(backend.fetch_limits().await.is_empty(), "no tick before first period");

        tokio::time::sleep(Duration::from_secs(190)).await;
        assert_eq!(backend.fetch_limits().await.len(), 2);
        assert_eq!(transport.sent_count().await, 1);
        assert_eq!(backend.schedule_calls(), 0);

        cancel.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_tick_only_triggers_backend() {
        let backend = MockBackend::new();
        let transport = MockTransport::new();
        let cancel = CancellationToken::new();

        let handle = scheduler(&backend, &transport).start(cancel.clone());

        tokio::time::sleep(Duration::from_secs(3601)).await;
        assert_eq!(backend.schedule_calls(), 1);
        assert_eq!(transport.attempts().await.len(), 0);

        cancel.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_failure_keeps_timer_running() {
        let backend = MockBackend::new();
        backend.fail_schedule();
        let transport = MockTransport::new();
        let cancel = CancellationToken::new();

        let handle = scheduler(&backend, &transport).start(cancel.clone());

        tokio::time::sleep(Duration::from_secs(2 * 3600 + 1)).await;
        assert_eq!(backend.schedule_calls(), 2);

        cancel.cancel();
        handle.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_both_timers() {
        let backend = MockBackend::new();
        let transport = MockTransport::new();
        let cancel = CancellationToken::new();

        let handle = scheduler(&backend, &transport).start(cancel.clone());
        cancel.cancel();
        handle.join().await;

        tokio::time::sleep(Duration::from_secs(7200)).await;
        assert!(backend.fetch_limits().await.is_empty());
        assert_eq!(backend.schedule_calls(), 0);
    }
}
