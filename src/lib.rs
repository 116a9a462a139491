//!
//! Library for collecting statistics from ArangoDB servers.
//!
//! ## Collecting
//! Every collection cycle logs in to each configured endpoint, fetches
//! `/_admin/statistics` and emits three records per endpoint to an
//! [`Accumulator`].
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), arangodb_stats::Error> {
//!     use arangodb_stats::{ArangoDb, Config, MemoryAccumulator};
//!
//!     let config = Config {
//!         urls: vec!["http://localhost:8529".to_string()],
//!         username: "root".to_string(),
//!         password: "root".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let plugin = ArangoDb::new(config);
//!     let acc = MemoryAccumulator::new();
//!
//!     let summary = plugin.gather(&acc).await;
//!     println!("{} endpoints collected", summary.succeeded);
//!
//!     for record in acc.records() {
//!         println!("{} {:?} {:?}", record.measurement, record.tags, record.fields);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Single endpoint
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     use arangodb_stats::{auth, normalize, stats, ClientBuilder};
//!
//!     let client = ClientBuilder::new().build()?;
//!     let base = url::Url::parse("http://localhost:8529")?;
//!
//!     let token = auth::login(&client, &base, "root", "root").await?;
//!     let statistics = stats::fetch(&client, &base, &token).await?;
//!     let normalized = normalize::normalize(&statistics)
//!         .map_err(|e| e.into_error(&base))?;
//!
//!     println!("{:?}", normalized.client);
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod auth;
pub mod collector;
pub mod config;
pub mod http;
pub mod normalize;
pub mod sink;
pub mod stats;

pub use collector::{ArangoDb, GatherSummary};
pub use config::Config;
pub use http::{ClientBuilder, URLExt};
pub use normalize::{FieldValue, Fields};
pub use sink::{Accumulator, MemoryAccumulator, Record};

/// Error returned by client functions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured endpoint is not a valid URL
    #[error("could not parse {url}: {source}")]
    InvalidUrl {
        /// URL as configured
        url: String,
        /// Parser error
        source: url::ParseError,
    },

    /// The endpoint could not be reached or the body could not be read
    #[error("error making HTTP request to {url}: {source}")]
    Connectivity {
        /// Endpoint base URL
        url: String,
        /// Transport error
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape
    #[error("error decoding response from {url}: {source}")]
    Decode {
        /// Endpoint base URL
        url: String,
        /// JSON error
        source: serde_json::Error,
    },

    /// Failed returned by the HTTP server
    #[error("HTTP failed {status} from {url}: {body}")]
    WebServer {
        /// Endpoint base URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The statistics payload decoded but can't be normalized
    #[error("malformed statistics from {url}: {reason}")]
    MalformedStatistics {
        /// Endpoint base URL
        url: String,
        /// What is missing
        reason: String,
    },

    /// HTTP client could not be created
    #[error("Reqwest: {0}")]
    HTTPClient(#[source] reqwest::Error),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn config(err: &str) -> Self {
        Self::Config(err.to_string())
    }

    /// The endpoint this error belongs to, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Connectivity { url, .. }
            | Self::Decode { url, .. }
            | Self::WebServer { url, .. }
            | Self::MalformedStatistics { url, .. } => Some(url),
            Self::HTTPClient(_) | Self::Config(_) => None,
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
