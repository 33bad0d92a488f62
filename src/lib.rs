//! meow - lightweight endpoint uptime monitoring.
//!
//! Periodically checks a set of HTTP endpoints, classifies each one's health
//! over time, and emits an ordered stream of status events to the console
//! and an append-only log file. A separate config service stores the
//! endpoint definitions and serves them over HTTP.

pub mod alert;
pub mod config;
pub mod duration;
pub mod endpoint;
pub mod logfile;
pub mod monitor;
pub mod probe;
pub mod shutdown;
pub mod source;
pub mod store;
pub mod web;

pub use endpoint::{Endpoint, EndpointPayload, Method, ValidationError};
pub use monitor::Monitor;
pub use probe::{Checker, Event, EventKind, HttpChecker, ProbeOutcome, ProberState};
