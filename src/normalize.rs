//!
//! Flattening of [`Statistics`] into metric fields
//!
use crate::stats::Statistics;
use crate::{Error, URLExt};
use std::collections::BTreeMap;

/// Histogram field names, in bucket order
pub const HISTOGRAM_BUCKETS: [&str; 6] = [
    "req_0.01", "req_0.05", "req_0.1", "req_0.2", "req_0.5", "req_1",
];

/// Numeric value of a metric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Counters and sizes
    Unsigned(u64),
    /// Times and other fractional values
    Float(f64),
}

impl FieldValue {
    /// Value as a float
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Unsigned(v) => *v as f64,
            Self::Float(v) => *v,
        }
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Unsigned(u64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        Self::Unsigned(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Field name to value, ordered by name
pub type Fields = BTreeMap<String, FieldValue>;

/// The request time histogram had fewer buckets than there are names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientBuckets {
    /// Number of buckets in the payload
    pub got: usize,
}

impl InsufficientBuckets {
    /// Convert into a per endpoint [`Error`]
    #[must_use]
    pub fn into_error(self, url: &url::Url) -> Error {
        Error::MalformedStatistics {
            url: url.base_str().to_string(),
            reason: self.to_string(),
        }
    }
}

impl std::fmt::Display for InsufficientBuckets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "insufficient histogram buckets: got {}, need {}",
            self.got,
            HISTOGRAM_BUCKETS.len()
        )
    }
}

impl std::error::Error for InsufficientBuckets {}

/// Pair bucket names with the leading bucket counts. Trailing buckets past
/// the last name are ignored, fewer than six buckets yields `None`.
#[must_use]
pub fn named_buckets(counts: &[u32]) -> Option<[(&'static str, u32); 6]> {
    let counts = counts.get(..HISTOGRAM_BUCKETS.len())?;
    Some(std::array::from_fn(|i| (HISTOGRAM_BUCKETS[i], counts[i])))
}

/// Fields of the three records produced for one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// `arangodb_system`
    pub system: Fields,
    /// `arangodb_server`
    pub server: Fields,
    /// `arangodb_client`
    pub client: Fields,
}

fn fields<const N: usize>(entries: [(&str, FieldValue); N]) -> Fields {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Flatten a statistics payload
pub fn normalize(stats: &Statistics) -> Result<Normalized, InsufficientBuckets> {
    let system = &stats.system;
    let server = &stats.server;
    let request_time = &stats.client.request_time;

    let buckets = named_buckets(&request_time.counts).ok_or(InsufficientBuckets {
        got: request_time.counts.len(),
    })?;

    let system = fields([
        ("majorPageFaults", system.major_page_faults.into()),
        ("minorPageFaults", system.minor_page_faults.into()),
        ("numberOfThreads", system.number_of_threads.into()),
        ("residentSize", system.resident_size.into()),
        ("systemTime", system.system_time.into()),
        ("userTime", system.user_time.into()),
        ("virtualSize", system.virtual_size.into()),
    ]);

    let server = fields([
        ("physicalMemory", server.physical_memory.into()),
        ("uptime", server.uptime.into()),
    ]);

    let mut client = fields(buckets.map(|(name, count)| (name, FieldValue::from(count))));
    client.insert("count".to_string(), request_time.count.into());
    client.insert("sum".to_string(), request_time.sum.into());

    Ok(Normalized {
        system,
        server,
        client,
    })
}
