// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message transport for deterministic testing.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use decodebot_core::{BotError, MessageTransport, OutboundMessage};
use tokio::sync::Mutex;

/// Captures every message passed to `send()`.
///
/// Failures can be injected for everyone or for specific recipients. Failed
/// sends are recorded as attempts but not as deliveries.
#[derive(Clone, Default)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    attempts: Arc<Mutex<Vec<OutboundMessage>>>,
    failing_recipients: Arc<Mutex<HashSet<i64>>>,
    fail_all: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent send fails.
    pub fn fail_all(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    /// Sends to `recipient` fail, as if the user blocked the bot.
    pub async fn fail_recipient(&self, recipient: i64) {
        self.failing_recipients.lock().await.insert(recipient);
    }

    /// Messages that were delivered.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Every send attempt, successful or not.
    pub async fn attempts(&self) -> Vec<OutboundMessage> {
        self.attempts.lock().await.clone()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), BotError> {
        self.attempts.lock().await.push(msg.clone());

        let blocked = self.failing_recipients.lock().await.contains(&msg.recipient);
        if blocked || self.fail_all.load(Ordering::SeqCst) {
            return Err(BotError::Transport {
                message: format!("Forbidden: bot was blocked by user {}", msg.recipient),
                source: None,
            });
        }

        self.sent.lock().await.push(msg);
        Ok(())
    }
}
