// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for the DEC0D3 bot.
//!
//! Implements [`MessageTransport`] over the Telegram Bot API via teloxide and
//! runs the long-polling loop that feeds `/start` and the admin commands.

pub mod commands;
pub mod handler;
pub mod polling;

use async_trait::async_trait;
use decodebot_config::model::TelegramConfig;
use decodebot_core::{BotError, MainMenu, MessageTransport, OutboundMessage, TextFormat};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, WebAppInfo};
use tracing::debug;

pub use commands::{Command, parse_command, parse_referral};
pub use handler::{CommandContext, Sender, handle_command};
pub use polling::run_polling;

/// Sends bot messages through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Creates a transport for the configured bot token.
    pub fn new(config: &TelegramConfig) -> Result<Self, BotError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            BotError::Config("telegram.bot_token is required".into())
        })?;

        if token.trim().is_empty() {
            return Err(BotError::Config("telegram.bot_token cannot be empty".into()));
        }

        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Calls `getMe` and returns the bot's username.
    pub async fn verify(&self) -> Result<String, BotError> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::transport(format!("getMe failed: {e}"), e))?;
        Ok(me.username().to_string())
    }
}

impl std::fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramTransport")
            .field("bot", &"[redacted]")
            .finish()
    }
}

/// Builds the one-button inline keyboard that opens the mini app.
pub fn menu_keyboard(menu: &MainMenu) -> Result<InlineKeyboardMarkup, BotError> {
    let url = reqwest::Url::parse(&menu.url)
        .map_err(|e| BotError::Config(format!("invalid mini app url {:?}: {e}", menu.url)))?;
    let button = InlineKeyboardButton::web_app(menu.label.clone(), WebAppInfo { url });
    Ok(InlineKeyboardMarkup::new(vec![vec![button]]))
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), BotError> {
        let mut request = self.bot.send_message(ChatId(msg.recipient), msg.text);

        if msg.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(menu) = &msg.menu {
            request = request.reply_markup(menu_keyboard(menu)?);
        }

        let sent = request.await.map_err(|e| {
            BotError::transport(format!("failed to send message to {}: {e}", msg.recipient), e)
        })?;
        debug!(recipient = msg.recipient, message_id = sent.id.0, "message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(str::to_string),
            ..TelegramConfig::default()
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramTransport::new(&config(None)).is_err());
    }

    #[test]
    fn new_rejects_blank_token() {
        assert!(TelegramTransport::new(&config(Some("  "))).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let transport =
            TelegramTransport::new(&config(Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11")))
                .unwrap();
        assert_eq!(transport.name(), "telegram");
    }

    #[test]
    fn debug_hides_token() {
        let transport = TelegramTransport::new(&config(Some("123456:SECRET"))).unwrap();
        assert!(!format!("{transport:?}").contains("SECRET"));
    }

    #[test]
    fn menu_keyboard_has_single_web_app_button() {
        let markup = menu_keyboard(&decodebot_messages::main_menu(
            "https://ushpuras.dev/DEC0D3/",
        ))
        .unwrap();
        assert_eq!(markup.inline_keyboard.len(), 1);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
        let button = &markup.inline_keyboard[0][0];
        assert_eq!(button.text, decodebot_messages::PLAY_LABEL);
        match &button.kind {
            InlineKeyboardButtonKind::WebApp(info) => {
                assert_eq!(info.url.as_str(), "https://ushpuras.dev/DEC0D3/")
            }
            other => panic!("expected web app button, got {other:?}"),
        }
    }

    #[test]
    fn menu_keyboard_rejects_bad_url() {
        let menu = MainMenu {
            label: "Play".into(),
            url: "not a url".into(),
        };
        assert!(menu_keyboard(&menu).is_err());
    }
}
