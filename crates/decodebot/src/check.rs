// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `decodebot check`: validate configuration and probe the backend.

use decodebot_client::{RetryPolicy, ServerClient};
use decodebot_config::DecodebotConfig;
use decodebot_core::{BackendApi, BotError, UserStats};

/// Outcome of a backend probe.
#[derive(Debug)]
pub struct CheckReport {
    pub backend_url: String,
    pub health: Result<(), BotError>,
    pub stats: Option<Result<UserStats, BotError>>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.health.is_ok() && matches!(self.stats, Some(Ok(_)))
    }

    pub fn render(&self) -> String {
        let mut out = format!("backend: {}\n", self.backend_url);
        match &self.health {
            Ok(()) => out.push_str("  health: ok\n"),
            Err(e) => out.push_str(&format!("  health: FAILED ({e})\n")),
        }
        match &self.stats {
            Some(Ok(stats)) => out.push_str(&format!(
                "  users:  {} total, {} active (7d)\n",
                stats.total_users, stats.active_users_7d
            )),
            Some(Err(e)) => out.push_str(&format!("  users:  FAILED ({e})\n")),
            None => out.push_str("  users:  skipped\n"),
        }
        out
    }
}

/// Probes health and, when healthy, user stats.
pub async fn probe(backend: &dyn BackendApi, backend_url: &str) -> CheckReport {
    let health = backend.health_check().await;
    let stats = match &health {
        Ok(()) => Some(backend.get_user_stats().await),
        Err(_) => None,
    };
    CheckReport {
        backend_url: backend_url.to_string(),
        health,
        stats,
    }
}

/// Runs the `decodebot check` command. Returns whether every probe passed.
pub async fn run_check(config: &DecodebotConfig) -> bool {
    println!("config: ok");

    let client = match ServerClient::new(
        config.backend.url.clone(),
        config.backend.secret().map(str::to_string),
        RetryPolicy::from_config(&config.backend),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {e}");
            return false;
        }
    };

    let report = probe(&client, client.base_url()).await;
    print!("{}", report.render());
    report.is_ok()
}
