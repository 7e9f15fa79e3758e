// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup probing and the admin status report.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use decodebot_core::{BackendApi, MessageTransport, OutboundMessage, UserStats};
use tracing::{info, warn};

/// First delay between startup health probes.
pub const PROBE_BASE_DELAY: Duration = Duration::from_secs(1);
/// Upper bound for the delay between startup health probes.
pub const PROBE_MAX_DELAY: Duration = Duration::from_secs(5);

/// Process start time, captured once at startup.
#[derive(Debug, Clone, Copy)]
pub struct StartupClock {
    started_at: DateTime<Local>,
    started: Instant,
}

impl StartupClock {
    pub fn start() -> Self {
        Self {
            started_at: Local::now(),
            started: Instant::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Polls the backend health endpoint until it answers or `attempts` run out.
///
/// The delay starts at `base` and doubles up to `cap`. Returns whether the
/// backend became ready; failure is never fatal.
pub async fn wait_for_backend(
    backend: &dyn BackendApi,
    attempts: u32,
    base: Duration,
    cap: Duration,
) -> bool {
    let attempts = attempts.max(1);
    let mut delay = base;

    info!("waiting for backend to be ready");
    for attempt in 1..=attempts {
        match backend.health_check().await {
            Ok(()) => {
                info!(attempt, "backend connection established");
                return true;
            }
            Err(e) if attempt < attempts => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    error = %e,
                    "backend not ready yet"
                );
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(cap);
            }
            Err(e) => {
                warn!(
                    attempts,
                    error = %e,
                    "backend health check failed, continuing without it"
                );
            }
        }
    }
    false
}

/// Host and process figures included in the admin report.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupMetrics {
    pub host: String,
    pub started_at: DateTime<Local>,
    pub uptime: Duration,
    pub version: &'static str,
    pub working_dir: String,
    pub worker_threads: usize,
    pub rss_bytes: Option<u64>,
    pub backend_healthy: bool,
    pub stats: UserStats,
}

/// Gathers [`StartupMetrics`]. Stats that cannot be fetched are reported as zeros.
pub async fn collect_metrics(clock: &StartupClock, backend: &dyn BackendApi) -> StartupMetrics {
    let backend_healthy = backend.health_check().await.is_ok();
    let stats = match backend.get_user_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            warn!(error = %e, "failed to fetch user stats");
            UserStats::default()
        }
    };

    StartupMetrics {
        host: sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string()),
        started_at: clock.started_at(),
        uptime: clock.uptime(),
        version: env!("CARGO_PKG_VERSION"),
        working_dir: std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|_| "unknown".to_string()),
        worker_threads: tokio::runtime::Handle::current().metrics().num_workers(),
        rss_bytes: read_rss_bytes(),
        backend_healthy,
        stats,
    }
}

/// Renders the admin report.
pub fn format_report(metrics: &StartupMetrics) -> String {
    let memory = metrics
        .rss_bytes
        .map(|b| format!("{:.2} MB", b as f64 / 1024.0 / 1024.0))
        .unwrap_or_else(|| "unknown".to_string());
    let (backend, status_emoji, status) = if metrics.backend_healthy {
        ("Connected", "✅", "Healthy")
    } else {
        ("Disconnected", "❌", "Disconnected")
    };

    format!(
        "🤖 Bot is active!\n\n\
         🖥️ Server: {host}\n\
         ⏰ Start time: {start}\n\
         ⌛️ Uptime: {uptime}\n\
         📂 Directory: {dir}\n\n\
         🦀 Version: decodebot {version}\n\
         ⚙️ Worker threads: {workers}\n\n\
         💾 Memory usage: {memory}\n\
         🗄️ Backend: {backend}\n\
         {status_emoji} Backend status: {status}\n\n\
         👥 Total users: {total}\n\
         👤 Active users (7d): {active}",
        host = metrics.host,
        start = metrics.started_at.format("%Y-%m-%d %H:%M:%S"),
        uptime = format_uptime(metrics.uptime),
        dir = metrics.working_dir,
        version = metrics.version,
        workers = metrics.worker_threads,
        total = metrics.stats.total_users,
        active = metrics.stats.active_users_7d,
    )
}

/// Formats a duration as `1d 2h 3m 4s`, dropping leading zero units.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Sends the startup report to `admin_id`. Failures are logged.
pub async fn send_startup_report(
    transport: &dyn MessageTransport,
    backend: &dyn BackendApi,
    clock: &StartupClock,
    admin_id: i64,
) {
    let metrics = collect_metrics(clock, backend).await;
    let report = format_report(&metrics);
    match transport.send(OutboundMessage::text(admin_id, report)).await {
        Ok(()) => info!(admin_id, "startup report sent to admin"),
        Err(e) => warn!(admin_id, error = %e, "failed to send startup report"),
    }
}

/// Read the process RSS in bytes from /proc/self/statm (Linux only).
pub fn read_rss_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        let rss_pages = statm.split_whitespace().nth(1)?.parse::<u64>().ok()?;
        Some(rss_pages * 4096)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decodebot_test_utils::{MockBackend, MockTransport};

    fn metrics() -> StartupMetrics {
        StartupMetrics {
            host: "bot-01".into(),
            started_at: Local::now(),
            uptime: Duration::from_secs(75),
            version: "0.1.0",
            working_dir: "/srv/decodebot".into(),
            worker_threads: 4,
            rss_bytes: Some(12 * 1024 * 1024),
            backend_healthy: true,
            stats: UserStats {
                total_users: 1200,
                active_users_7d: 340,
            },
        }
    }

    #[test]
    fn format_uptime_units() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(90061)), "1d 1h 1m 1s");
    }

    #[test]
    fn report_lists_host_memory_and_users() {
        let report = format_report(&metrics());
        assert!(report.starts_with("🤖 Bot is active!"));
        assert!(report.contains("🖥️ Server: bot-01"));
        assert!(report.contains("⌛️ Uptime: 1m 15s"));
        assert!(report.contains("💾 Memory usage: 12.00 MB"));
        assert!(report.contains("✅ Backend status: Healthy"));
        assert!(report.contains("👥 Total users: 1200"));
        assert!(report.contains("👤 Active users (7d): 340"));
    }

    #[test]
    fn report_marks_unhealthy_backend_and_unknown_memory() {
        let mut m = metrics();
        m.backend_healthy = false;
        m.rss_bytes = None;
        let report = format_report(&m);
        assert!(report.contains("🗄️ Backend: Disconnected"));
        assert!(report.contains("❌ Backend status: Disconnected"));
        assert!(report.contains("Memory usage: unknown"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn rss_is_readable_on_linux() {
        assert!(read_rss_bytes().unwrap() > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_backend_gives_up_after_attempts() {
        let backend = MockBackend::new();
        backend.set_unhealthy();

        let started = tokio::time::Instant::now();
        let ready = wait_for_backend(&backend, 10, PROBE_BASE_DELAY, PROBE_MAX_DELAY).await;

        assert!(!ready);
        assert_eq!(backend.health_calls(), 10);
        // 1 + 2 + 4 + 5 * 6 seconds of backoff between ten probes.
        assert_eq!(started.elapsed(), Duration::from_secs(37));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_backend_returns_on_first_success() {
        let backend = MockBackend::new();
        let ready = wait_for_backend(&backend, 10, PROBE_BASE_DELAY, PROBE_MAX_DELAY).await;
        assert!(ready);
        assert_eq!(backend.health_calls(), 1);
    }

    #[tokio::test]
    async fn collect_metrics_defaults_missing_stats_to_zero() {
        let backend = MockBackend::new();
        let metrics = collect_metrics(&StartupClock::start(), &backend).await;
        assert!(metrics.backend_healthy);
        assert_eq!(metrics.stats, UserStats::default());
        assert!(metrics.worker_threads >= 1);
    }

    #[tokio::test]
    async fn startup_report_goes_to_admin() {
        let backend = MockBackend::new();
        backend
            .set_stats(UserStats {
                total_users: 7,
                active_users_7d: 3,
            })
            .await;
        let transport = MockTransport::new();

        send_startup_report(&transport, &backend, &StartupClock::start(), 1000).await;

        let sent = transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, 1000);
        assert!(sent[0].text.contains("👥 Total users: 7"));
    }
}
