// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handling.
//!
//! Turns a parsed [`Command`] from a Telegram sender into backend calls and
//! at most one reply. Independent of teloxide so it can run against mocks.

use std::sync::Arc;

use decodebot_core::{BackendApi, OutboundMessage, Registration};
use decodebot_messages::{MessageResolver, main_menu};
use teloxide::types::User;
use tracing::{debug, info, warn};

use crate::commands::{Command, parse_referral};

/// Streak shown by `/test_streak`.
const TEST_STREAK: i64 = 5;

/// Who sent a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub telegram_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Self {
            telegram_id: user.id.0 as i64,
            username: user.username.clone().unwrap_or_default(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
        }
    }
}

impl Sender {
    fn registration(&self) -> Registration {
        Registration {
            telegram_id: self.telegram_id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Everything the command handler needs.
#[derive(Clone)]
pub struct CommandContext {
    pub backend: Arc<dyn BackendApi>,
    pub resolver: Arc<MessageResolver>,
    pub mini_app_url: String,
    pub admin_id: Option<i64>,
}

impl CommandContext {
    pub fn is_admin(&self, telegram_id: i64) -> bool {
        self.admin_id == Some(telegram_id)
    }
}

/// Executes `command` for `sender` and returns the reply for `chat_id`.
///
/// Backend failures are logged and never prevent the reply, except for
/// `/debug_schedule` whose reply reports the failure.
pub async fn handle_command(
    ctx: &CommandContext,
    chat_id: i64,
    sender: &Sender,
    command: Command,
) -> Option<OutboundMessage> {
    if command.is_admin_only() && !ctx.is_admin(sender.telegram_id) {
        debug!(telegram_id = sender.telegram_id, ?command, "ignoring admin command");
        return None;
    }

    let menu = main_menu(&ctx.mini_app_url);

    match command {
        Command::Start { payload } => {
            start(ctx, sender, payload.as_deref()).await;
            let text = ctx.resolver.welcome(&sender.first_name);
            Some(OutboundMessage::text(chat_id, text).with_menu(menu))
        }
        Command::TestDaily => {
            let text = ctx.resolver.daily_reminder(&sender.first_name, 0);
            Some(OutboundMessage::text(chat_id, text).with_menu(menu))
        }
        Command::TestStreak => {
            let text = ctx.resolver.daily_reminder(&sender.first_name, TEST_STREAK);
            Some(OutboundMessage::text(chat_id, text).with_menu(menu))
        }
        Command::DebugSchedule => {
            let text = match ctx.backend.schedule_notifications().await {
                Ok(()) => {
                    info!("daily notification scheduling triggered by admin");
                    "✅ Server triggered to schedule daily notifications!".to_string()
                }
                Err(e) => {
                    warn!(error = %e, "admin schedule trigger failed");
                    format!("❌ Failed to schedule: {e}")
                }
            };
            Some(OutboundMessage::text(chat_id, text))
        }
    }
}

async fn start(ctx: &CommandContext, sender: &Sender, payload: Option<&str>) {
    match ctx.backend.register_user(&sender.registration()).await {
        Ok(()) => info!(telegram_id = sender.telegram_id, "user registered"),
        Err(e) => warn!(telegram_id = sender.telegram_id, error = %e, "registration failed"),
    }

    let Some(referrer_id) = payload.and_then(parse_referral) else {
        return;
    };
    if referrer_id == sender.telegram_id {
        debug!(telegram_id = sender.telegram_id, "ignoring self-referral");
        return;
    }

    match ctx
        .backend
        .process_referral(referrer_id, sender.telegram_id)
        .await
    {
        Ok(resp) => info!(
            referrer_id,
            referred_id = sender.telegram_id,
            success = resp.success,
            shards = resp.shards_awarded,
            message = %resp.message,
            "referral processed"
        ),
        Err(e) => warn!(
            referrer_id,
            referred_id = sender.telegram_id,
            error = %e,
            "referral failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decodebot_core::ReferralRequest;
    use decodebot_test_utils::MockBackend;
    use teloxide::types::Message;

    const ADMIN: i64 = 1000;

    fn ctx(backend: &MockBackend) -> CommandContext {
        CommandContext {
            backend: Arc::new(backend.clone()),
            resolver: Arc::new(MessageResolver::with_seed(7)),
            mini_app_url: "https://ushpuras.dev/DEC0D3/".into(),
            admin_id: Some(ADMIN),
        }
    }

    fn sender(id: i64) -> Sender {
        Sender {
            telegram_id: id,
            username: "ava".into(),
            first_name: "Ava".into(),
            last_name: String::new(),
        }
    }

    #[test]
    fn sender_from_telegram_message() {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {"id": 12345i64, "type": "private", "first_name": "Ava"},
            "from": {"id": 12345u64, "is_bot": false, "first_name": "Ava", "username": "ava"},
            "text": "/start",
        });
        let msg: Message = serde_json::from_value(json).expect("failed to deserialize mock message");
        let sender = Sender::from(msg.from.as_ref().unwrap());
        assert_eq!(sender.telegram_id, 12345);
        assert_eq!(sender.username, "ava");
        assert_eq!(sender.last_name, "");
    }

    #[tokio::test]
    async fn start_registers_and_welcomes() {
        let backend = MockBackend::new();
        let reply = handle_command(&ctx(&backend), 555, &sender(555), Command::Start { payload: None })
            .await
            .unwrap();

        assert_eq!(reply.recipient, 555);
        assert!(reply.text.contains("Ava"));
        assert!(reply.menu.is_some());
        let regs = backend.registrations().await;
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].telegram_id, 555);
        assert!(backend.referrals().await.is_empty());
    }

    #[tokio::test]
    async fn start_with_referral_credits_referrer() {
        let backend = MockBackend::new();
        let cmd = Command::Start {
            payload: Some("ref_111".into()),
        };
        handle_command(&ctx(&backend), 555, &sender(555), cmd).await.unwrap();

        assert_eq!(
            backend.referrals().await,
            vec![ReferralRequest {
                referrer_id: 111,
                referred_id: 555
            }]
        );
    }

    #[tokio::test]
    async fn self_referral_is_ignored() {
        let backend = MockBackend::new();
        let cmd = Command::Start {
            payload: Some("ref_555".into()),
        };
        handle_command(&ctx(&backend), 555, &sender(555), cmd).await.unwrap();
        assert!(backend.referrals().await.is_empty());
    }

    #[tokio::test]
    async fn registration_failure_still_replies() {
        let backend = MockBackend::new();
        backend.fail_register();
        let reply =
            handle_command(&ctx(&backend), 555, &sender(555), Command::Start { payload: None }).await;
        assert!(reply.is_some());
    }

    #[tokio::test]
    async fn admin_commands_ignored_for_regular_users() {
        let backend = MockBackend::new();
        for cmd in [Command::TestDaily, Command::TestStreak, Command::DebugSchedule] {
            assert!(handle_command(&ctx(&backend), 555, &sender(555), cmd).await.is_none());
        }
        assert_eq!(backend.schedule_calls(), 0);
    }

    #[tokio::test]
    async fn test_streak_mentions_streak() {
        let backend = MockBackend::new();
        let reply = handle_command(&ctx(&backend), ADMIN, &sender(ADMIN), Command::TestStreak)
            .await
            .unwrap();
        assert!(reply.text.contains('5'));
        assert!(reply.menu.is_some());
    }

    #[tokio::test]
    async fn debug_schedule_reports_success_and_failure() {
        let backend = MockBackend::new();
        let reply = handle_command(&ctx(&backend), ADMIN, &sender(ADMIN), Command::DebugSchedule)
            .await
            .unwrap();
        assert_eq!(reply.text, "✅ Server triggered to schedule daily notifications!");
        assert_eq!(backend.schedule_calls(), 1);

        backend.fail_schedule();
        let reply = handle_command(&ctx(&backend), ADMIN, &sender(ADMIN), Command::DebugSchedule)
            .await
            .unwrap();
        assert!(reply.text.starts_with("❌ Failed to schedule: "));
    }
}
