//! Webhook alert delivery.
//!
//! Fire-and-forget: a delivery failure is logged and dropped, never retried
//! and never surfaced to the monitoring engine.

use serde::Serialize;

/// Posts alert texts to a webhook as `{"text": ...}`.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

impl Notifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    pub async fn notify(&self, text: &str) {
        let result = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookMessage { text })
            .send()
            .await;
        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!("alert webhook answered {}", response.status());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("deliver alert webhook: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_text_as_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({
                "text": "ALERT: api is offline (3 failed attempts)"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::new(format!("{}/hook", server.uri()));
        notifier
            .notify("ALERT: api is offline (3 failed attempts)")
            .await;
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let notifier = Notifier::new("http://127.0.0.1:1/hook");
        // Must not panic or propagate anything.
        notifier.notify("ALERT: api is offline (1 failed attempts)").await;
    }
}
