//! Probing and health classification.
//!
//! A [`Checker`] performs one check against an [`Endpoint`] and reports a
//! [`ProbeOutcome`]. The [`ProberState`] machine folds a stream of outcomes
//! into status [`Event`]s: online, recovered, not online, and at most one
//! alert per outage.

mod http;

pub use http::{HttpChecker, DEFAULT_PROBE_TIMEOUT};

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::endpoint::Endpoint;

/// The result of one check: the observed status code (absent on transport
/// failure), how long the check took, and when it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
    /// Cause of a transport failure; set exactly when `status` is `None`.
    pub error: Option<String>,
}

impl ProbeOutcome {
    pub fn observed(status: u16, elapsed: Duration) -> Self {
        Self {
            status: Some(status),
            elapsed,
            started_at: Utc::now(),
            error: None,
        }
    }

    pub fn failed(cause: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status: None,
            elapsed,
            started_at: Utc::now(),
            error: Some(cause.into()),
        }
    }
}

/// Performs one check against an endpoint.
///
/// Implementations must not fail: transport problems are reported through
/// [`ProbeOutcome::failed`], never as an error the caller has to handle.
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, endpoint: &Endpoint) -> ProbeOutcome;
}

/// Classification of an emitted event, used to route alert-class events to
/// the notifier without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Diagnostic line, e.g. a transport failure cause or startup notice.
    Check,
    Online,
    Recovered,
    Offline,
    Alert,
}

/// One status line produced by a prober, consumed by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub identifier: String,
    pub kind: EventKind,
    pub text: String,
}

impl Event {
    pub fn new(identifier: &str, kind: EventKind, text: String) -> Self {
        Self {
            identifier: identifier.to_string(),
            kind,
            text,
        }
    }
}

/// Whether an outcome counts as "online" for the given endpoint.
///
/// Transport failures and status mismatches are deliberately not
/// distinguished; this function is the single place to change if they ever
/// should be.
pub fn is_success(endpoint: &Endpoint, outcome: &ProbeOutcome) -> bool {
    outcome.status == Some(endpoint.status_online())
}

/// Per-endpoint health state, owned exclusively by that endpoint's prober
/// task.
#[derive(Debug, Default)]
pub struct ProberState {
    consecutive_failures: u32,
    /// `None` until the first check completes.
    last_known_up: Option<bool>,
    alert_raised: bool,
}

impl ProberState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome into the state and return the events it produces, in
    /// emission order.
    pub fn classify(&mut self, endpoint: &Endpoint, outcome: &ProbeOutcome) -> Vec<Event> {
        let id = endpoint.identifier();
        let mut events = Vec::new();

        if let Some(cause) = &outcome.error {
            events.push(Event::new(
                id,
                EventKind::Check,
                format!("check failed: {cause}"),
            ));
        }

        if is_success(endpoint, outcome) {
            if self.last_known_up == Some(false) {
                events.push(Event::new(
                    id,
                    EventKind::Recovered,
                    format!("{id} is online again (took {:?})", outcome.elapsed),
                ));
            } else {
                events.push(Event::new(
                    id,
                    EventKind::Online,
                    format!("{id} is online (took {:?})", outcome.elapsed),
                ));
            }
            self.last_known_up = Some(true);
            self.consecutive_failures = 0;
            self.alert_raised = false;
        } else {
            self.consecutive_failures += 1;
            events.push(Event::new(
                id,
                EventKind::Offline,
                format!("{id} is not online ({} times)", self.consecutive_failures),
            ));
            if self.consecutive_failures >= endpoint.fail_after() && !self.alert_raised {
                events.push(Event::new(
                    id,
                    EventKind::Alert,
                    format!(
                        "ALERT: {id} is offline ({} failed attempts)",
                        endpoint.fail_after()
                    ),
                ));
                self.alert_raised = true;
            }
            self.last_known_up = Some(false);
        }

        events
    }
}
