// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the DEC0D3 bot.

use thiserror::Error;

/// The error type shared by the backend client, the messaging transport,
/// the dispatcher and the webhook receiver.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration errors (missing token, malformed URL, bad header value).
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP request to the backend never produced a response.
    #[error("http error: {message}")]
    Http {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-success status code.
    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// A response or request body could not be decoded.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The messaging transport refused or failed to deliver a message.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Returns the backend status code when this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            BotError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Builds a [`BotError::Transport`] from any send failure.
    pub fn transport<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BotError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display_includes_status_and_body() {
        let err = BotError::Backend {
            status: 503,
            body: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "backend returned 503: overloaded");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn non_backend_errors_have_no_status() {
        let err = BotError::Http {
            message: "connection refused".into(),
            source: None,
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "http error: connection refused");
    }

    #[test]
    fn transport_helper_keeps_source() {
        let err = BotError::transport("blocked by user", std::io::Error::other("403"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "transport error: blocked by user");
    }
}
