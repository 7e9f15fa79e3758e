// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use decodebot_core::MainMenu;

/// Label of the button that opens the game.
pub const PLAY_LABEL: &str = "🎮 Play DEC0D3 Game 🎮";

/// The single call-to-action attached to welcome and reminder messages.
pub fn main_menu(mini_app_url: &str) -> MainMenu {
    MainMenu {
        label: PLAY_LABEL.to_string(),
        url: mini_app_url.to_string(),
    }
}
