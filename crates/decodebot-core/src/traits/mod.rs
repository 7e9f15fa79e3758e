// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the bot's pipeline and the outside world.

pub mod backend;
pub mod transport;

pub use backend::BackendApi;
pub use transport::MessageTransport;
