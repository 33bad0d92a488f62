//! Endpoint model and validation.
//!
//! An [`Endpoint`] describes one thing to monitor: where to probe, how, and
//! how to judge the outcome. Construction validates every field at once, so a
//! value of this type is valid by definition. [`EndpointPayload`] is the
//! serde-facing form used by the config API, and the flat record form feeds
//! the CSV store.

use std::fmt;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::duration::{format_duration, parse_duration};

const ID_PATTERN_RAW: &str = "^[a-z][-a-z0-9]+$";

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(ID_PATTERN_RAW).unwrap());

/// Number of fields in the flat record form.
const RECORD_FIELDS: usize = 6;

/// Validation error raised when an endpoint field violates its constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// HTTP method allowed for probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
        }
    }

    fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            other => Err(ValidationError::new(
                "method",
                format!("\"{other}\" is not an allowed method"),
            )),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something to monitor, with the rules to judge it by.
///
/// Immutable once constructed; every accessor returns a value that already
/// passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    identifier: String,
    url: Url,
    method: Method,
    status_online: u16,
    frequency: Duration,
    fail_after: u32,
}

/// The serializable form of an [`Endpoint`], with the frequency as a
/// duration string such as `"5m0s"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPayload {
    pub identifier: String,
    pub url: String,
    pub method: String,
    pub status_online: u16,
    pub frequency: String,
    pub fail_after: u32,
}

impl Endpoint {
    /// Construct a validated endpoint. Fails with the first violated
    /// constraint: identifier pattern, URL parse, method, status range,
    /// frequency, failure threshold.
    pub fn new(
        identifier: &str,
        raw_url: &str,
        method: &str,
        status_online: u16,
        frequency: Duration,
        fail_after: u32,
    ) -> Result<Self, ValidationError> {
        if !ID_PATTERN.is_match(identifier) {
            return Err(ValidationError::new(
                "identifier",
                format!("\"{identifier}\" does not match pattern {ID_PATTERN_RAW}"),
            ));
        }
        let url = Url::parse(raw_url)
            .map_err(|e| ValidationError::new("url", format!("parse \"{raw_url}\": {e}")))?;
        let method = Method::parse(method)?;
        if !(100..=999).contains(&status_online) {
            return Err(ValidationError::new(
                "status_online",
                format!("{status_online} is not a valid status code"),
            ));
        }
        if frequency.is_zero() {
            return Err(ValidationError::new("frequency", "must be greater than zero"));
        }
        if fail_after == 0 {
            return Err(ValidationError::new("fail_after", "must be at least 1"));
        }
        Ok(Self {
            identifier: identifier.to_string(),
            url,
            method,
            status_online,
            frequency,
            fail_after,
        })
    }

    /// Construct an endpoint with default rules: GET, status 200, probed
    /// every five minutes, alerting after three consecutive failures.
    pub fn with_defaults(identifier: &str, raw_url: &str) -> Result<Self, ValidationError> {
        Self::new(
            identifier,
            raw_url,
            "GET",
            200,
            Duration::from_secs(5 * 60),
            3,
        )
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn status_online(&self) -> u16 {
        self.status_online
    }

    pub fn frequency(&self) -> Duration {
        self.frequency
    }

    pub fn fail_after(&self) -> u32 {
        self.fail_after
    }

    /// Build an endpoint from its serializable payload form.
    pub fn from_payload(payload: &EndpointPayload) -> Result<Self, ValidationError> {
        let frequency = parse_duration(&payload.frequency).map_err(|e| {
            ValidationError::new("frequency", format!("\"{}\": {e}", payload.frequency))
        })?;
        Self::new(
            &payload.identifier,
            &payload.url,
            &payload.method,
            payload.status_online,
            frequency,
            payload.fail_after,
        )
    }

    pub fn to_payload(&self) -> EndpointPayload {
        EndpointPayload {
            identifier: self.identifier.clone(),
            url: self.url.to_string(),
            method: self.method.as_str().to_string(),
            status_online: self.status_online,
            frequency: format_duration(self.frequency),
            fail_after: self.fail_after,
        }
    }

    /// Build an endpoint from a flat record in the field order: identifier,
    /// url, method, status_online, frequency, fail_after.
    pub fn from_record(record: &[String]) -> Result<Self, ValidationError> {
        if record.len() < RECORD_FIELDS {
            return Err(ValidationError::new(
                "record",
                format!("needs {RECORD_FIELDS} fields, got {}", record.len()),
            ));
        }
        let status_online: u16 = record[3].parse().map_err(|_| {
            ValidationError::new(
                "status_online",
                format!("\"{}\" is not a valid status code", record[3]),
            )
        })?;
        let frequency = parse_duration(&record[4])
            .map_err(|e| ValidationError::new("frequency", format!("\"{}\": {e}", record[4])))?;
        let fail_after: u32 = record[5].parse().map_err(|_| {
            ValidationError::new("fail_after", format!("\"{}\" is not a number", record[5]))
        })?;
        Self::new(
            &record[0],
            &record[1],
            &record[2],
            status_online,
            frequency,
            fail_after,
        )
    }

    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.identifier.clone(),
            self.url.to_string(),
            self.method.as_str().to_string(),
            self.status_online.to_string(),
            format_duration(self.frequency),
            self.fail_after.to_string(),
        ]
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.identifier,
            self.url,
            self.method,
            self.status_online,
            format_duration(self.frequency),
            self.fail_after
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Endpoint {
        Endpoint::new(
            "api",
            "https://example.test/health",
            "GET",
            200,
            Duration::from_secs(30),
            3,
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_endpoint() {
        let e = valid();
        assert_eq!(e.identifier(), "api");
        assert_eq!(e.url().as_str(), "https://example.test/health");
        assert_eq!(e.method(), Method::Get);
        assert_eq!(e.status_online(), 200);
        assert_eq!(e.frequency(), Duration::from_secs(30));
        assert_eq!(e.fail_after(), 3);
    }

    #[test]
    fn defaults_are_get_200_5m_3() {
        let e = Endpoint::with_defaults("api", "https://example.test").unwrap();
        assert_eq!(e.method(), Method::Get);
        assert_eq!(e.status_online(), 200);
        assert_eq!(e.frequency(), Duration::from_secs(300));
        assert_eq!(e.fail_after(), 3);
    }

    #[test]
    fn rejects_bad_identifiers() {
        for id in ["A-bad", "-bad", "x", "", "has space", "9lead"] {
            let err = Endpoint::new(
                id,
                "https://example.test",
                "GET",
                200,
                Duration::from_secs(1),
                1,
            )
            .unwrap_err();
            assert_eq!(err.field, "identifier", "identifier {id:?} should fail");
        }
    }

    #[test]
    fn rejects_relative_url() {
        let err =
            Endpoint::new("api", "/health", "GET", 200, Duration::from_secs(1), 1).unwrap_err();
        assert_eq!(err.field, "url");
    }

    #[test]
    fn rejects_disallowed_methods() {
        for method in ["POST", "DELETE", "get", ""] {
            let err = Endpoint::new(
                "api",
                "https://example.test",
                method,
                200,
                Duration::from_secs(1),
                1,
            )
            .unwrap_err();
            assert_eq!(err.field, "method", "method {method:?} should fail");
        }
    }

    #[test]
    fn status_online_bounds() {
        for status in [50, 99, 1000] {
            let err = Endpoint::new(
                "api",
                "https://example.test",
                "GET",
                status,
                Duration::from_secs(1),
                1,
            )
            .unwrap_err();
            assert_eq!(err.field, "status_online", "status {status} should fail");
        }
        for status in [100, 999] {
            assert!(Endpoint::new(
                "api",
                "https://example.test",
                "GET",
                status,
                Duration::from_secs(1),
                1,
            )
            .is_ok());
        }
    }

    #[test]
    fn rejects_zero_frequency_and_threshold() {
        let err =
            Endpoint::new("api", "https://example.test", "GET", 200, Duration::ZERO, 1)
                .unwrap_err();
        assert_eq!(err.field, "frequency");

        let err = Endpoint::new(
            "api",
            "https://example.test",
            "GET",
            200,
            Duration::from_secs(1),
            0,
        )
        .unwrap_err();
        assert_eq!(err.field, "fail_after");
    }

    #[test]
    fn payload_round_trip() {
        let e = valid();
        assert_eq!(Endpoint::from_payload(&e.to_payload()).unwrap(), e);
    }

    #[test]
    fn record_round_trip() {
        let e = valid();
        assert_eq!(Endpoint::from_record(&e.to_record()).unwrap(), e);
    }

    #[test]
    fn payload_json_round_trip() {
        let e = valid();
        let json = serde_json::to_string(&e.to_payload()).unwrap();
        let payload: EndpointPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(Endpoint::from_payload(&payload).unwrap(), e);
    }

    #[test]
    fn short_record_is_rejected() {
        let record: Vec<String> = vec!["api".into(), "https://example.test".into()];
        let err = Endpoint::from_record(&record).unwrap_err();
        assert_eq!(err.field, "record");
    }

    #[test]
    fn payload_rejects_bad_frequency() {
        let mut payload = valid().to_payload();
        payload.frequency = "fast".to_string();
        let err = Endpoint::from_payload(&payload).unwrap_err();
        assert_eq!(err.field, "frequency");
    }
}
