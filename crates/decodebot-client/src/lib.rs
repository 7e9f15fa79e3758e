// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend API client for the DEC0D3 bot.
//!
//! [`ServerClient`] implements [`decodebot_core::BackendApi`] over HTTP with
//! bounded exponential backoff ([`RetryPolicy`]).

pub mod client;
pub mod retry;

pub use client::{SECRET_HEADER, ServerClient};
pub use retry::RetryPolicy;
