// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling loop.

use std::sync::Arc;
use std::time::Duration;

use decodebot_core::MessageTransport;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::TelegramTransport;
use crate::commands::parse_command;
use crate::handler::{CommandContext, Sender, handle_command};

/// Receives updates via `getUpdates` until `cancel` fires.
///
/// Every message is logged; recognised commands are answered through
/// `transport`.
pub async fn run_polling(
    transport: TelegramTransport,
    ctx: CommandContext,
    bot_username: Option<String>,
    poll_timeout: Duration,
    cancel: CancellationToken,
) {
    let bot = transport.bot().clone();
    let transport = Arc::new(transport);
    let ctx = Arc::new(ctx);
    let bot_username: Arc<Option<String>> = Arc::new(bot_username);

    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let transport = transport.clone();
        let ctx = ctx.clone();
        let bot_username = bot_username.clone();
        async move {
            let text = msg.text().unwrap_or_default();
            info!(
                message_id = msg.id.0,
                chat_id = msg.chat.id.0,
                text,
                "update received"
            );

            let Some(user) = msg.from.as_ref() else {
                debug!(message_id = msg.id.0, "ignoring message without sender");
                return respond(());
            };
            let Some(command) = parse_command(text, bot_username.as_deref()) else {
                return respond(());
            };

            let sender = Sender::from(user);
            if let Some(reply) = handle_command(&ctx, msg.chat.id.0, &sender, command).await
                && let Err(e) = transport.send(reply).await
            {
                warn!(chat_id = msg.chat.id.0, error = %e, "failed to send reply");
            }

            respond(())
        }
    });

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .default_handler(|_| async {})
        .build();

    let shutdown = dispatcher.shutdown_token();
    tokio::spawn(async move {
        cancel.cancelled().await;
        match shutdown.shutdown() {
            Ok(done) => done.await,
            Err(e) => debug!(error = %e, "dispatcher was not running at shutdown"),
        }
    });

    let listener = Polling::builder(bot).timeout(poll_timeout).build();

    info!(timeout_secs = poll_timeout.as_secs(), "starting Telegram long polling");
    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("error from the update listener"),
        )
        .await;
    info!("Telegram long polling stopped");
}
