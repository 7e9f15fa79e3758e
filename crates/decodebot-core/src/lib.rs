// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the DEC0D3 Telegram bot.
//!
//! Holds the shared error type, the job and user types exchanged with the
//! game backend, and the two seams the rest of the workspace plugs into:
//! [`BackendApi`] and [`MessageTransport`].

pub mod error;
pub mod traits;
pub mod types;

pub use error::BotError;
pub use traits::{BackendApi, MessageTransport};
pub use types::{
    JobKind, JobStatus, MainMenu, NotificationJob, OutboundMessage, ReferralRequest,
    ReferralResponse, Registration, TextFormat, UserIdentity, UserProfile, UserStats,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_error_has_all_variants() {
        let _config = BotError::Config("test".into());
        let _http = BotError::Http {
            message: "test".into(),
            source: None,
        };
        let _backend = BotError::Backend {
            status: 500,
            body: String::new(),
        };
        let _decode = BotError::Decode {
            message: "test".into(),
            source: None,
        };
        let _transport = BotError::Transport {
            message: "test".into(),
            source: None,
        };
        let _timeout = BotError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        let _internal = BotError::Internal("test".into());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _backend(_: &dyn BackendApi) {}
        fn _transport(_: &dyn MessageTransport) {}
    }
}
