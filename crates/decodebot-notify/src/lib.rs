// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification delivery for the DEC0D3 bot.
//!
//! [`NotificationDispatcher`] runs a single poll-and-deliver cycle against
//! the backend queue; [`NotificationScheduler`] drives it on a timer.

pub mod dispatcher;
pub mod scheduler;

pub use dispatcher::{CycleOutcome, CycleReport, DEFAULT_BATCH_SIZE, NotificationDispatcher};
pub use scheduler::{NotificationScheduler, SchedulerHandle};
