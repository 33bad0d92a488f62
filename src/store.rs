//! CSV-backed configuration store for the config service.
//!
//! Endpoints live in a map behind a reader-writer lock: reads never block
//! each other, writes are serialized and visible to every subsequent read.
//! Each successful upsert rewrites the CSV file atomically (temp file plus
//! rename) while the write lock is held.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use thiserror::Error;

use crate::endpoint::{Endpoint, ValidationError};

/// Store error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("read config file {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("config file {path}, line {line}: {source}")]
    Record {
        path: String,
        line: usize,
        #[source]
        source: ValidationError,
    },
    #[error("persist config to {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Whether an upsert created a new endpoint or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Endpoint configuration keyed by identifier, persisted as CSV.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    endpoints: RwLock<HashMap<String, Endpoint>>,
}

impl ConfigStore {
    /// Load the store from `path`. A missing file starts an empty store; a
    /// malformed file or invalid record is fatal.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut endpoints = HashMap::new();

        if path.exists() {
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_path(&path)
                .map_err(|source| StoreError::Load {
                    path: path.display().to_string(),
                    source,
                })?;
            for (line, result) in reader.records().enumerate() {
                let record = result.map_err(|source| StoreError::Load {
                    path: path.display().to_string(),
                    source,
                })?;
                let fields: Vec<String> = record.iter().map(str::to_string).collect();
                let endpoint =
                    Endpoint::from_record(&fields).map_err(|source| StoreError::Record {
                        path: path.display().to_string(),
                        line: line + 1,
                        source,
                    })?;
                endpoints.insert(endpoint.identifier().to_string(), endpoint);
            }
            tracing::info!(
                "loaded {} endpoints from {}",
                endpoints.len(),
                path.display()
            );
        } else {
            tracing::info!("config file {} does not exist, starting empty", path.display());
        }

        Ok(Self {
            path,
            endpoints: RwLock::new(endpoints),
        })
    }

    /// All endpoints, ordered by identifier.
    pub async fn list(&self) -> Vec<Endpoint> {
        let endpoints = self.endpoints.read().await;
        let mut all: Vec<Endpoint> = endpoints.values().cloned().collect();
        all.sort_by(|a, b| a.identifier().cmp(b.identifier()));
        all
    }

    pub async fn get(&self, identifier: &str) -> Option<Endpoint> {
        self.endpoints.read().await.get(identifier).cloned()
    }

    /// Insert or replace an endpoint and rewrite the CSV file.
    ///
    /// The in-memory map keeps the new value even when persisting fails; the
    /// caller sees the failure and the next successful write converges the
    /// file again.
    pub async fn upsert(&self, endpoint: Endpoint) -> Result<UpsertOutcome, StoreError> {
        let mut endpoints = self.endpoints.write().await;
        let previous = endpoints.insert(endpoint.identifier().to_string(), endpoint);
        let outcome = if previous.is_some() {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        self.persist(&endpoints)?;
        Ok(outcome)
    }

    fn persist(&self, endpoints: &HashMap<String, Endpoint>) -> Result<(), StoreError> {
        let persist_err = |source: io::Error| StoreError::Persist {
            path: self.path.display().to_string(),
            source,
        };

        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)
                .map_err(|e| persist_err(csv_io_error(e)))?;
            let mut all: Vec<&Endpoint> = endpoints.values().collect();
            all.sort_by(|a, b| a.identifier().cmp(b.identifier()));
            for endpoint in all {
                writer
                    .write_record(endpoint.to_record())
                    .map_err(|e| persist_err(csv_io_error(e)))?;
            }
            writer.flush().map_err(persist_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(persist_err)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn csv_io_error(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => io::Error::other(format!("{other:?}")),
    }
}
