//!
//! Destination of emitted records and per endpoint errors
//!
use crate::{Error, Fields};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Process statistics record
pub const SYSTEM_MEASUREMENT: &str = "arangodb_system";
/// Server statistics record
pub const SERVER_MEASUREMENT: &str = "arangodb_server";
/// Request time histogram record
pub const CLIENT_MEASUREMENT: &str = "arangodb_client";

/// Record tags, a single `url` tag for records of this crate
pub type Tags = BTreeMap<String, String>;

/// Receiver of collected metrics.
///
/// Called concurrently from every endpoint of a cycle, implementations
/// synchronize internally.
pub trait Accumulator: Send + Sync {
    /// Add one record
    fn add_fields(&self, measurement: &'static str, fields: Fields, tags: Tags, time: DateTime<Utc>);

    /// Report the failure of one endpoint
    fn add_error(&self, err: Error);
}

/// One emitted record
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub measurement: &'static str,
    pub tags: Tags,
    pub fields: Fields,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<Record>,
    errors: Vec<Error>,
}

/// [`Accumulator`] keeping everything in memory
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    state: Mutex<State>,
}

impl MemoryAccumulator {
    /// Create an empty accumulator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panicking writer can't leave a half pushed record behind.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All records added so far
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }

    /// Records tagged with `url`
    #[must_use]
    pub fn records_for(&self, url: &str) -> Vec<Record> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.tags.get("url").map(String::as_str) == Some(url))
            .cloned()
            .collect()
    }

    /// Messages of all errors added so far
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.lock().errors.iter().map(ToString::to_string).collect()
    }

    /// Drain records and errors
    pub fn take(&self) -> (Vec<Record>, Vec<Error>) {
        let mut state = self.lock();
        (
            std::mem::take(&mut state.records),
            std::mem::take(&mut state.errors),
        )
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_fields(&self, measurement: &'static str, fields: Fields, tags: Tags, time: DateTime<Utc>) {
        self.lock().records.push(Record {
            measurement,
            tags,
            fields,
            time,
        });
    }

    fn add_error(&self, err: Error) {
        tracing::debug!("error added: {}", err);
        self.lock().errors.push(err);
    }
}
