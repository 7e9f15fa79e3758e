// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message content for the DEC0D3 bot: welcome text, daily reminders and
//! the main menu button.

pub mod menu;
pub mod resolver;
pub mod templates;

pub use menu::{PLAY_LABEL, main_menu};
pub use resolver::{MessageResolver, no_streak_templates, streak_templates};
