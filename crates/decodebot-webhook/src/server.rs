// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use decodebot_config::DecodebotConfig;
use decodebot_core::{BotError, MessageTransport};
use decodebot_messages::MessageResolver;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::auth::{SecretAuth, secret_middleware};
use crate::handlers;

/// Shared, read-only state for webhook handlers.
#[derive(Clone)]
pub struct WebhookState {
    pub transport: Arc<dyn MessageTransport>,
    pub resolver: Arc<MessageResolver>,
    pub mini_app_url: String,
    pub referral_shards: u32,
    pub auth: SecretAuth,
}

impl WebhookState {
    pub fn from_config(
        config: &DecodebotConfig,
        transport: Arc<dyn MessageTransport>,
        resolver: Arc<MessageResolver>,
    ) -> Self {
        Self {
            referral_shards: resolver.referral_shards(),
            transport,
            resolver,
            mini_app_url: config.telegram.mini_app_url.clone(),
            auth: SecretAuth::new(config.backend.secret().map(str::to_string)),
        }
    }
}

/// Webhook server bind address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The webhook route table:
/// - POST /webhook/new-user (secret)
/// - POST /webhook/referral (secret)
/// - GET /health
pub fn router(state: WebhookState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new().route("/health", get(handlers::get_health));

    let webhook_routes = Router::new()
        .route("/webhook/new-user", post(handlers::post_new_user))
        .route("/webhook/referral", post(handlers::post_referral))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            secret_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .layer(TraceLayer::new_for_http())
}

/// Binds `config` and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: WebhookState,
    cancel: CancellationToken,
) -> Result<(), BotError> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await.map_err(|e| BotError::Http {
        message: format!("failed to bind webhook server to {addr}: {e}"),
        source: Some(Box::new(e)),
    })?;
    serve(listener, state, cancel).await
}

/// Serves the webhook routes on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    state: WebhookState,
    cancel: CancellationToken,
) -> Result<(), BotError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, auth = state.auth.is_enabled(), "webhook server listening");
    }

    let app = router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { cancel.cancelled().await })
    .await
    .map_err(|e| BotError::Http {
        message: format!("webhook server error: {e}"),
        source: Some(Box::new(e)),
    })
}
