// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `decodebot serve` command implementation.
//!
//! Waits for the backend, authorizes the bot, starts the notification timers
//! and the webhook receiver, reports to the admin and then long-polls
//! Telegram until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use decodebot_client::{RetryPolicy, ServerClient};
use decodebot_config::DecodebotConfig;
use decodebot_core::{BackendApi, BotError, MessageTransport};
use decodebot_messages::MessageResolver;
use decodebot_notify::{NotificationDispatcher, NotificationScheduler};
use decodebot_telegram::{CommandContext, TelegramTransport, run_polling};
use decodebot_webhook::{ServerConfig, WebhookState, start_server};
use tracing::{error, info, warn};

use crate::shutdown;
use crate::startup::{self, PROBE_BASE_DELAY, PROBE_MAX_DELAY, StartupClock};

/// Runs the `decodebot serve` command.
///
/// Only an invalid bot token is fatal; backend outages are logged and
/// retried by the timers.
pub async fn run_serve(config: DecodebotConfig) -> Result<(), BotError> {
    init_tracing(config.bot.effective_log_level());
    let clock = StartupClock::start();

    info!(version = env!("CARGO_PKG_VERSION"), "starting decodebot serve");
    if config.bot.debug {
        info!("debug mode enabled");
    }

    let cancel = shutdown::install_signal_handler();

    let client = ServerClient::new(
        config.backend.url.clone(),
        config.backend.secret().map(str::to_string),
        RetryPolicy::from_config(&config.backend),
    )?;
    let backend: Arc<dyn BackendApi> = Arc::new(client);

    let backend_ready = startup::wait_for_backend(
        backend.as_ref(),
        config.backend.startup_health_attempts,
        PROBE_BASE_DELAY,
        PROBE_MAX_DELAY,
    )
    .await;

    let telegram = TelegramTransport::new(&config.telegram)?;
    let username = telegram.verify().await?;
    info!(username = %username, "bot authorized");

    let transport: Arc<dyn MessageTransport> = Arc::new(telegram.clone());
    let resolver = Arc::new(
        MessageResolver::from_seed(config.messages.seed)
            .with_referral_shards(config.messages.referral_shards),
    );

    let scheduler = if config.scheduler.enabled {
        let dispatcher = Arc::new(
            NotificationDispatcher::new(
                Arc::clone(&backend),
                Arc::clone(&transport),
                Arc::clone(&resolver),
                config.telegram.mini_app_url.clone(),
            )
            .with_batch_size(config.scheduler.batch_size),
        );
        let handle =
            NotificationScheduler::from_config(dispatcher, &config.scheduler).start(cancel.clone());
        info!(
            process_interval_secs = config.scheduler.process_interval_secs,
            schedule_interval_secs = config.scheduler.schedule_interval_secs,
            "notification scheduler started"
        );
        Some(handle)
    } else {
        info!("notification scheduler disabled");
        None
    };

    let webhook = if config.webhook.enabled {
        let state = WebhookState::from_config(&config, Arc::clone(&transport), Arc::clone(&resolver));
        let server_config = ServerConfig {
            host: config.webhook.host.clone(),
            port: config.webhook.port,
        };
        let cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = start_server(&server_config, state, cancel).await {
                error!(error = %e, "webhook server failed");
            }
        }))
    } else {
        info!("webhook server disabled");
        None
    };

    match (backend_ready, config.bot.admin_id) {
        (true, Some(admin_id)) => {
            startup::send_startup_report(transport.as_ref(), backend.as_ref(), &clock, admin_id)
                .await;
        }
        (true, None) => info!("no admin configured, skipping startup report"),
        (false, _) => warn!("skipping startup report, backend not ready"),
    }

    let ctx = CommandContext {
        backend: Arc::clone(&backend),
        resolver,
        mini_app_url: config.telegram.mini_app_url.clone(),
        admin_id: config.bot.admin_id,
    };
    let bot_username = config.telegram.bot_username.clone().or(Some(username));
    let poll_timeout = Duration::from_secs(u64::from(config.telegram.poll_timeout_secs));

    info!("bot is running");
    run_polling(telegram, ctx, bot_username, poll_timeout, cancel.clone()).await;

    cancel.cancel();
    if let Some(scheduler) = scheduler {
        scheduler.join().await;
    }
    if let Some(webhook) = webhook
        && let Err(e) = webhook.await
    {
        warn!(error = %e, "webhook task panicked");
    }

    info!("decodebot serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("decodebot={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
