// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot command parsing.

/// A command recognised by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` with its optional deep-link payload.
    Start { payload: Option<String> },
    TestDaily,
    TestStreak,
    DebugSchedule,
}

impl Command {
    /// Admin-only commands are ignored for everyone else.
    pub fn is_admin_only(&self) -> bool {
        !matches!(self, Command::Start { .. })
    }
}

/// Parses a message text into a [`Command`].
///
/// Accepts `/cmd@botname` when `botname` matches `bot_username` (or when the
/// bot's username is unknown). Returns `None` for plain text, unknown
/// commands and commands addressed to another bot.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;

    let (head, payload) = match rest.split_once(char::is_whitespace) {
        Some((head, payload)) => (head, Some(payload.trim())),
        None => (rest, None),
    };

    let name = match head.split_once('@') {
        Some((name, target)) => {
            if let Some(own) = bot_username
                && !own.trim_start_matches('@').eq_ignore_ascii_case(target)
            {
                return None;
            }
            name
        }
        None => head,
    };

    match name {
        "start" => Some(Command::Start {
            payload: payload.filter(|p| !p.is_empty()).map(str::to_string),
        }),
        "test_daily" => Some(Command::TestDaily),
        "test_streak" => Some(Command::TestStreak),
        "debug_schedule" => Some(Command::DebugSchedule),
        _ => None,
    }
}

/// Extracts the referrer id from a `ref_<id>` start payload.
///
/// Only positive ids are accepted.
pub fn parse_referral(payload: &str) -> Option<i64> {
    payload
        .strip_prefix("ref_")?
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
}
