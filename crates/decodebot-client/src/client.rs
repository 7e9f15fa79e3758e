// SPDX-FileCopyrightText: 2026 Decodebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DEC0D3 game backend.
//!
//! [`ServerClient`] handles URL construction, the shared-secret header,
//! and retry of transient failures (transport errors and 5xx).

use std::fmt;

use async_trait::async_trait;
use decodebot_core::{
    BackendApi, BotError, JobStatus, NotificationJob, ReferralRequest, ReferralResponse,
    Registration, UserProfile, UserStats,
};
use reqwest::header::HeaderValue;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::retry::RetryPolicy;

/// Header carrying the shared secret on bot-to-backend calls.
pub const SECRET_HEADER: &str = "X-Bot-Secret";

/// Client for the backend's `/api` surface.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: String,
    secret: Option<HeaderValue>,
    policy: RetryPolicy,
}

impl fmt::Debug for ServerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerClient")
            .field("base_url", &self.base_url)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("policy", &self.policy)
            .finish()
    }
}

#[derive(Serialize)]
struct StatusUpdate {
    status: JobStatus,
}

impl ServerClient {
    /// Creates a client for `base_url`.
    ///
    /// An empty `bot_secret` is treated like `None`: no header is sent.
    pub fn new(
        base_url: impl Into<String>,
        bot_secret: Option<String>,
        policy: RetryPolicy,
    ) -> Result<Self, BotError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let secret = bot_secret
            .filter(|s| !s.is_empty())
            .map(|s| {
                let mut value = HeaderValue::from_str(&s).map_err(|e| {
                    BotError::Config(format!("invalid bot secret header value: {e}"))
                })?;
                value.set_sensitive(true);
                Ok::<_, BotError>(value)
            })
            .transpose()?;

        let http = reqwest::Client::builder()
            .timeout(policy.request_timeout)
            .build()
            .map_err(|e| BotError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!(url = %base_url, "backend client initialized");

        Ok(Self {
            http,
            base_url,
            secret,
            policy,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_secret(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.secret {
            Some(secret) => builder.header(SECRET_HEADER, secret.clone()),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.with_secret(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.with_secret(self.http.post(self.url(path)))
    }

    /// Sends a request, retrying transport errors and 5xx responses.
    ///
    /// `build` is called once per attempt. Any response below 500 is
    /// returned immediately. Once attempts run out the last 5xx response is
    /// returned as `Ok`, so callers must check the status themselves; the
    /// last transport error is returned as `Err`.
    pub async fn execute<F>(&self, build: F) -> Result<Response, BotError>
    where
        F: Fn() -> RequestBuilder,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            let result = build().send().await;
            let is_last = attempt + 1 >= max_attempts;

            match result {
                Ok(response) if !response.status().is_server_error() => {
                    debug!(
                        status = response.status().as_u16(),
                        url = %response.url(),
                        attempt = attempt + 1,
                        max_attempts,
                        "backend response received"
                    );
                    return Ok(response);
                }
                Ok(response) if is_last => {
                    warn!(
                        status = response.status().as_u16(),
                        url = %response.url(),
                        attempts = max_attempts,
                        "backend still failing after all attempts"
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        status = response.status().as_u16(),
                        url = %response.url(),
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "backend returned server error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if is_last => {
                    warn!(error = %e, attempts = max_attempts, "backend request failed after all attempts");
                    return Err(self.request_error(e));
                }
                Err(e) => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "backend request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }

            attempt += 1;
        }
    }

    fn request_error(&self, e: reqwest::Error) -> BotError {
        if e.is_timeout() {
            BotError::Timeout {
                duration: self.policy.request_timeout,
            }
        } else {
            BotError::Http {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

/// Turns any status outside `accepted` into [`BotError::Backend`].
async fn expect_status(response: Response, accepted: &[StatusCode]) -> Result<Response, BotError> {
    let status = response.status();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BotError::Backend {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BotError> {
    let bytes = response.bytes().await.map_err(|e| BotError::Http {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| BotError::Decode {
        message: format!("failed to parse backend response: {e}"),
        source: Some(Box::new(e)),
    })
}

#[async_trait]
impl BackendApi for ServerClient {
    async fn health_check(&self) -> Result<(), BotError> {
        let response = self
            .http
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        expect_status(response, &[StatusCode::OK]).await?;
        Ok(())
    }

    async fn register_user(&self, registration: &Registration) -> Result<(), BotError> {
        let response = self
            .execute(|| self.post("/api/bot/register").json(registration))
            .await?;
        expect_status(response, &[StatusCode::OK, StatusCode::CREATED]).await?;
        info!(
            telegram_id = registration.telegram_id,
            username = %registration.username,
            "user registered"
        );
        Ok(())
    }

    async fn get_user_profile(&self, telegram_id: i64) -> Result<UserProfile, BotError> {
        let path = format!("/api/bot/stats/{telegram_id}");
        let response = self.execute(|| self.get(&path)).await?;
        decode(expect_status(response, &[StatusCode::OK]).await?).await
    }

    async fn process_referral(
        &self,
        referrer_id: i64,
        referred_id: i64,
    ) -> Result<ReferralResponse, BotError> {
        let body = ReferralRequest {
            referrer_id,
            referred_id,
        };
        let response = self
            .execute(|| self.post("/api/bot/referral").json(&body))
            .await?;
        decode(response).await
    }

    async fn schedule_notifications(&self) -> Result<(), BotError> {
        let response = self
            .execute(|| self.post("/api/bot/notifications/schedule"))
            .await?;
        expect_status(response, &[StatusCode::OK]).await?;
        Ok(())
    }

    async fn fetch_pending(&self, limit: usize) -> Result<Vec<NotificationJob>, BotError> {
        let path = format!("/api/bot/notifications/pending?limit={limit}");
        let response = self.execute(|| self.get(&path)).await?;
        // An empty queue may come back as `null`.
        let jobs: Option<Vec<NotificationJob>> =
            decode(expect_status(response, &[StatusCode::OK]).await?).await?;
        Ok(jobs.unwrap_or_default())
    }

    async fn update_job_status(&self, job_id: u64, status: JobStatus) -> Result<(), BotError> {
        let path = format!("/api/bot/notifications/{job_id}");
        let body = StatusUpdate { status };
        let response = self.execute(|| self.post(&path).json(&body)).await?;
        expect_status(response, &[StatusCode::OK]).await?;
        Ok(())
    }

    async fn get_user_stats(&self) -> Result<UserStats, BotError> {
        let response = self.execute(|| self.get("/api/bot/stats")).await?;
        decode(expect_status(response, &[StatusCode::OK]).await?).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            request_timeout: Duration::from_secs(2),
        }
    }

    fn test_client(base_url: &str) -> ServerClient {
        ServerClient::new(base_url, Some("s3cret".into()), fast_policy()).unwrap()
    }

    fn registration() -> Registration {
        Registration {
            telegram_id: 555,
            username: "ava".into(),
            first_name: "Ava".into(),
            last_name: String::new(),
        }
    }

    #[tokio::test]
    async fn register_user_accepts_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bot/register"))
            .and(header("X-Bot-Secret", "s3cret"))
            .and(body_json(serde_json::json!({
                "telegram_id": 555,
                "username": "ava",
                "first_name": "Ava",
                "last_name": ""
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.register_user(&registration()).await.unwrap();
    }

    #[tokio::test]
    async fn execute_exhausts_retries_on_503_and_returns_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bot/register"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(4)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client
            .execute(|| client.post("/api/bot/register").json(&registration()))
            .await
            .expect("exhausted 5xx is still a response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn register_user_maps_final_503_to_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bot/register"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(4)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.register_user(&registration()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bot/stats/42"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_user_profile(42).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bot/stats"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/bot/stats"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"total_users": 10, "active_users_7d": 4})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let stats = client.get_user_stats().await.unwrap();
        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.active_users_7d, 4);
    }

    #[tokio::test]
    async fn transport_error_is_returned_after_all_attempts() {
        // Nothing listens on port 9 of localhost in the test environment.
        let client = ServerClient::new("http://127.0.0.1:9", None, fast_policy()).unwrap();
        let err = client.get_user_stats().await.unwrap_err();
        assert!(
            matches!(err, BotError::Http { .. } | BotError::Timeout { .. }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn health_check_is_single_attempt_without_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.health_check().await.unwrap_err();
        assert_eq!(err.status(), Some(503));

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get(SECRET_HEADER).is_none());
    }

    #[tokio::test]
    async fn fetch_pending_passes_limit_and_keeps_order() {
        let server = MockServer::start().await;
        let jobs = serde_json::json!([
            {"id": 3, "user_id": 1, "type": "DAILY_CHALLENGE", "status": "PENDING",
             "user": {"telegram_id": 100, "first_name": "A"}},
            {"id": 1, "user_id": 2, "type": "DAILY_CHALLENGE", "status": "PENDING", "user": null},
        ]);
        Mock::given(method("GET"))
            .and(path("/api/bot/notifications/pending"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&jobs))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fetched = client.fetch_pending(20).await.unwrap();
        assert_eq!(fetched.iter().map(|j| j.id).collect::<Vec<_>>(), vec![3, 1]);
        assert!(fetched[1].user.is_none());
    }

    #[tokio::test]
    async fn fetch_pending_treats_null_as_empty_queue() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bot/notifications/pending"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fetched = client.fetch_pending(20).await.unwrap();
        assert!(fetched.is_empty());
    }

    #[tokio::test]
    async fn fetch_pending_rejects_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bot/notifications/pending"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.fetch_pending(20).await.unwrap_err();
        assert!(matches!(err, BotError::Decode { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn update_job_status_posts_status_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bot/notifications/17"))
            .and(body_json(serde_json::json!({"status": "SENT"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.update_job_status(17, JobStatus::Sent).await.unwrap();
    }

    #[tokio::test]
    async fn process_referral_decodes_body_on_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bot/referral"))
            .and(body_json(serde_json::json!({"referrer_id": 1, "referred_id": 2})))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "shards_awarded": 0,
                "message": "already referred"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let verdict = client.process_referral(1, 2).await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.message, "already referred");
    }

    #[tokio::test]
    async fn empty_secret_sends_no_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bot/notifications/schedule"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = ServerClient::new(server.uri(), Some(String::new()), fast_policy()).unwrap();
        client.schedule_notifications().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get(SECRET_HEADER).is_none());
    }

    #[test]
    fn debug_redacts_secret() {
        let client =
            ServerClient::new("http://localhost:8081/", Some("hunter2".into()), fast_policy())
                .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("hunter2"));
        assert_eq!(client.base_url(), "http://localhost:8081");
    }
}
