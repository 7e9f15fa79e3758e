// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook request handlers.
//!
//! Handles POST /webhook/new-user, POST /webhook/referral and GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use decodebot_core::OutboundMessage;
use decodebot_messages::main_menu;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::server::WebhookState;

/// Request body for POST /webhook/new-user.
#[derive(Debug, Deserialize)]
pub struct NewUserEvent {
    #[serde(default)]
    pub telegram_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
}

/// Request body for POST /webhook/referral.
#[derive(Debug, Deserialize)]
pub struct ReferralEvent {
    #[serde(default)]
    pub referrer_id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub referred_name: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Acknowledgement returned by both webhook routes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

type AckResponse = (StatusCode, Json<Ack>);

fn ack(status: StatusCode, success: bool, message: impl Into<String>) -> AckResponse {
    (
        status,
        Json(Ack {
            success,
            message: message.into(),
        }),
    )
}

fn parse<T: for<'de> Deserialize<'de>>(body: &Bytes, route: &str) -> Result<T, AckResponse> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(route, error = %e, "invalid webhook body");
        ack(StatusCode::BAD_REQUEST, false, "Invalid request body")
    })
}

/// POST /webhook/new-user: welcome a freshly registered player.
///
/// A failed send is reported back as 500.
pub async fn post_new_user(State(state): State<WebhookState>, body: Bytes) -> AckResponse {
    let event: NewUserEvent = match parse(&body, "new-user") {
        Ok(event) => event,
        Err(response) => return response,
    };

    if event.telegram_id == 0 {
        warn!("new-user webhook without telegram_id");
        return ack(StatusCode::BAD_REQUEST, false, "telegram_id is required");
    }

    info!(
        telegram_id = event.telegram_id,
        first_name = %event.first_name,
        "new-user webhook received"
    );

    let msg = OutboundMessage::text(event.telegram_id, state.resolver.welcome(&event.first_name))
        .with_menu(main_menu(&state.mini_app_url));

    match state.transport.send(msg).await {
        Ok(()) => {
            info!(telegram_id = event.telegram_id, "welcome message sent");
            ack(StatusCode::OK, true, "Welcome message sent")
        }
        Err(e) => {
            warn!(telegram_id = event.telegram_id, error = %e, "failed to send welcome message");
            ack(
                StatusCode::INTERNAL_SERVER_ERROR,
                false,
                format!("Failed to send message: {e}"),
            )
        }
    }
}

/// POST /webhook/referral: tell the referrer their invite landed.
///
/// The backend has already credited the referral, so a failed send is only
/// logged and the response is still a success.
pub async fn post_referral(State(state): State<WebhookState>, body: Bytes) -> AckResponse {
    let event: ReferralEvent = match parse(&body, "referral") {
        Ok(event) => event,
        Err(response) => return response,
    };

    if event.referrer_id == 0 {
        warn!("referral webhook without referrer_id");
        return ack(StatusCode::BAD_REQUEST, false, "referrer_id is required");
    }

    info!(
        referrer_id = event.referrer_id,
        referred_name = %event.referred_name,
        "referral webhook received"
    );

    let text = referral_notice(&event.referred_name, state.referral_shards);
    let msg = OutboundMessage::text(event.referrer_id, text).html();

    match state.transport.send(msg).await {
        Ok(()) => info!(referrer_id = event.referrer_id, "referral notification sent"),
        Err(e) => warn!(
            referrer_id = event.referrer_id,
            error = %e,
            "failed to send referral notification"
        ),
    }

    ack(StatusCode::OK, true, "Referral notification sent")
}

/// GET /health
pub async fn get_health() -> &'static str {
    "OK"
}

/// HTML text congratulating a referrer.
pub fn referral_notice(referred_name: &str, shards: u32) -> String {
    format!(
        "🚀 User <b>{}</b> just joined via your invite link!\n\n💎 You received +{shards} Shards!",
        escape_html(referred_name)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_names_decode_as_empty() {
        let event: NewUserEvent =
            serde_json::from_str(r#"{"telegram_id": 555, "first_name": null}"#).unwrap();
        assert_eq!(event.first_name, "");

        let event: ReferralEvent =
            serde_json::from_str(r#"{"referrer_id": 111, "referred_name": null}"#).unwrap();
        assert_eq!(event.referred_name, "");

        let event: NewUserEvent = serde_json::from_str(r#"{"telegram_id": 7}"#).unwrap();
        assert_eq!(event.first_name, "");
    }

    #[test]
    fn referral_notice_escapes_name() {
        let text = referral_notice("<script>&", 20);
        assert!(text.contains("<b>&lt;script&gt;&amp;</b>"));
        assert!(text.ends_with("+20 Shards!"));
    }

    #[test]
    fn new_user_event_defaults_missing_fields() {
        let event: NewUserEvent = serde_json::from_str(r#"{"first_name": "Ava"}"#).unwrap();
        assert_eq!(event.telegram_id, 0);
    }

    #[test]
    fn ack_serializes() {
        let json = serde_json::to_value(Ack {
            success: true,
            message: "Welcome message sent".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Welcome message sent"})
        );
    }
}
