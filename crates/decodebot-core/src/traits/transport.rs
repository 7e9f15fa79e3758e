// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging trait (Telegram in production, mocks in tests).

use async_trait::async_trait;

use crate::error::BotError;
use crate::types::OutboundMessage;

/// Delivers a single message to a single user.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Short human-readable transport name, used in logs.
    fn name(&self) -> &str;

    /// Sends one message. Errors are [`BotError::Transport`].
    async fn send(&self, msg: OutboundMessage) -> Result<(), BotError>;
}
