//! HTTP checker implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;

use super::{Checker, ProbeOutcome};
use crate::endpoint::{Endpoint, Method};

/// Default bound on a single check. Keeps an unreachable endpoint from
/// starving its own schedule.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probes endpoints over HTTP with a per-check timeout.
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    /// Build a checker whose requests are bounded by `timeout`. A timeout
    /// expiry is reported as a transport failure, like any other.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn check(&self, endpoint: &Endpoint) -> ProbeOutcome {
        let url = endpoint.url().clone();
        let request = match endpoint.method() {
            Method::Get => self.client.get(url),
            Method::Head => self.client.head(url),
        };

        let started_at = Utc::now();
        let start = Instant::now();
        let result = request.send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => ProbeOutcome {
                status: Some(response.status().as_u16()),
                elapsed,
                started_at,
                error: None,
            },
            Err(e) => ProbeOutcome {
                status: None,
                elapsed,
                started_at,
                error: Some(e.to_string()),
            },
        }
    }
}
