// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound webhook receiver for the DEC0D3 bot.
//!
//! The game backend calls these routes to push new-user and referral events;
//! each event results in exactly one message to the affected player.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::SecretAuth;
pub use handlers::{Ack, referral_notice};
pub use server::{ServerConfig, WebhookState, router, serve, start_server};
