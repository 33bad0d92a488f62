//! Startup fetch of endpoint definitions from the config service.
//!
//! Any failure here is fatal: the monitor refuses to start on an unreachable
//! source, a malformed payload, or a single invalid endpoint.

use std::collections::HashSet;

use thiserror::Error;

use crate::endpoint::{Endpoint, EndpointPayload, ValidationError};

/// Endpoint source error types.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("fetch endpoints from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("decode endpoints payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("endpoint \"{identifier}\": {source}")]
    Invalid {
        identifier: String,
        #[source]
        source: ValidationError,
    },
    #[error("duplicate endpoint identifier \"{0}\"")]
    Duplicate(String),
}

/// Fetch and validate all endpoint definitions from
/// `<config_url>/endpoints`.
pub async fn fetch_endpoints(
    client: &reqwest::Client,
    config_url: &str,
) -> Result<Vec<Endpoint>, SourceError> {
    let url = format!("{}/endpoints", config_url.trim_end_matches('/'));

    let payloads: Vec<EndpointPayload> = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| SourceError::Fetch {
            url: url.clone(),
            source,
        })?
        .json()
        .await
        .map_err(|source| SourceError::Decode {
            url: url.clone(),
            source,
        })?;

    let mut seen = HashSet::new();
    let mut endpoints = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        let endpoint =
            Endpoint::from_payload(payload).map_err(|source| SourceError::Invalid {
                identifier: payload.identifier.clone(),
                source,
            })?;
        if !seen.insert(endpoint.identifier().to_string()) {
            return Err(SourceError::Duplicate(endpoint.identifier().to_string()));
        }
        endpoints.push(endpoint);
    }
    Ok(endpoints)
}
