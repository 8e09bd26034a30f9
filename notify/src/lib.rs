//! Outbound operator alerting.
//!
//! One `Notifier`, two wire shapes: a generic JSON webhook and a
//! token-authenticated push-message API. Delivery is fire-and-forget;
//! `notify` reports success as a bool and a failed delivery is only logged
//! locally, never re-notified.

use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bound on a single delivery attempt, so a dead endpoint cannot stall the
/// poll loop indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How the alert travels to the operator.
#[derive(Debug, Clone)]
pub enum Transport {
    /// Generic webhook taking a JSON body with `content` and `username`.
    Webhook { url: String },
    /// Push-message API taking a URL-encoded form with a bearer token. The
    /// endpoint reports the real outcome in a `status` field of the JSON
    /// response body.
    PushApi { url: String, token: String },
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
    username: &'a str,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    status: i64,
}

pub struct Notifier {
    client: Client,
    transport: Transport,
}

impl Notifier {
    pub fn new(transport: Transport) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, transport })
    }

    /// Deliver a short text alert. Returns whether the endpoint accepted it;
    /// never propagates an error past this boundary.
    pub async fn notify(&self, service: &str, message: &str) -> bool {
        match &self.transport {
            Transport::Webhook { url } => self.send_webhook(url, service, message).await,
            Transport::PushApi { url, token } => self.send_push(url, token, message).await,
        }
    }

    async fn send_webhook(&self, url: &str, service: &str, message: &str) -> bool {
        let body = WebhookMessage {
            content: message,
            username: service,
        };

        let response = match self.client.post(url).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("error {err} when sending notification");
                return false;
            }
        };

        let status = response.status();
        if !webhook_delivered(status) {
            let body = response.text().await.unwrap_or_default();
            warn!("notification endpoint returned {status}: {body}");
            return false;
        }

        debug!("notification delivered with status {status}");
        true
    }

    async fn send_push(&self, url: &str, token: &str, message: &str) -> bool {
        let response = match self
            .client
            .post(url)
            .bearer_auth(token)
            .form(&[("message", message)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("error {err} when sending notification");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("push endpoint returned {status}: {body}");
            return false;
        }

        // The push API answers 200 at the HTTP layer even for rejected
        // messages; the body carries the real status.
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!("error {err} reading push endpoint response");
                return false;
            }
        };

        if !push_delivered(&body) {
            warn!("push endpoint rejected message: {body}");
            return false;
        }

        debug!("push notification delivered");
        true
    }
}

fn webhook_delivered(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::NO_CONTENT
}

fn push_delivered(body: &str) -> bool {
    match serde_json::from_str::<PushResponse>(body) {
        Ok(response) => response.status == 200,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_accepts_200_and_204_only() {
        assert!(webhook_delivered(StatusCode::OK));
        assert!(webhook_delivered(StatusCode::NO_CONTENT));
        assert!(!webhook_delivered(StatusCode::BAD_REQUEST));
        assert!(!webhook_delivered(StatusCode::TOO_MANY_REQUESTS));
        assert!(!webhook_delivered(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn webhook_payload_shape() {
        let body = WebhookMessage {
            content: "database ping failed, will reconnect",
            username: "homelogger",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["content"], "database ping failed, will reconnect");
        assert_eq!(json["username"], "homelogger");
    }

    #[test]
    fn push_body_status_200_is_delivered() {
        assert!(push_delivered(r#"{"status":200,"message":"ok"}"#));
    }

    #[test]
    fn push_body_status_401_is_not_delivered() {
        // HTTP 200 with an unauthorized body still counts as a failure.
        assert!(!push_delivered(r#"{"status":401,"message":"Invalid access token"}"#));
    }

    #[test]
    fn push_body_garbage_is_not_delivered() {
        assert!(!push_delivered("not json"));
    }
}
