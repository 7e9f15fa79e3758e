// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret authentication for webhook routes.
//!
//! The backend sends the bot secret in `X-Bot-Secret`. With no secret
//! configured every request is accepted.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Header the backend uses to authenticate itself.
pub const SECRET_HEADER: &str = "x-bot-secret";

/// Secret expected on inbound webhook requests.
#[derive(Clone, Default)]
pub struct SecretAuth {
    secret: Option<String>,
}

impl std::fmt::Debug for SecretAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretAuth")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl SecretAuth {
    /// An empty secret disables the check.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Whether a request carrying `provided` may pass.
    pub fn accepts(&self, provided: Option<&str>) -> bool {
        match &self.secret {
            None => true,
            Some(expected) => provided == Some(expected.as_str()),
        }
    }
}

/// Rejects requests whose `X-Bot-Secret` does not match with 401.
pub async fn secret_middleware(
    State(auth): State<SecretAuth>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    if auth.accepts(provided) {
        return Ok(next.run(request).await);
    }

    let remote = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::warn!(
        path = %request.uri().path(),
        remote = %remote,
        "unauthorized webhook request"
    );
    Err(StatusCode::UNAUTHORIZED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_secret_accepts_everything() {
        let auth = SecretAuth::new(None);
        assert!(!auth.is_enabled());
        assert!(auth.accepts(None));
        assert!(auth.accepts(Some("anything")));
    }

    #[test]
    fn empty_secret_disables_check() {
        let auth = SecretAuth::new(Some(String::new()));
        assert!(!auth.is_enabled());
        assert!(auth.accepts(None));
    }

    #[test]
    fn configured_secret_must_match_exactly() {
        let auth = SecretAuth::new(Some("s3cret".into()));
        assert!(auth.accepts(Some("s3cret")));
        assert!(!auth.accepts(Some("S3CRET")));
        assert!(!auth.accepts(Some("")));
        assert!(!auth.accepts(None));
    }

    #[test]
    fn debug_redacts_secret() {
        let auth = SecretAuth::new(Some("s3cret".into()));
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("[redacted]"));
    }
}
