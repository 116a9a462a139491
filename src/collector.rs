//!
//! Collection cycle over all configured endpoints
//!
use crate::sink::{Tags, CLIENT_MEASUREMENT, SERVER_MEASUREMENT, SYSTEM_MEASUREMENT};
use crate::{auth, config, normalize, stats};
use crate::{Accumulator, ClientBuilder, Config, Error, Result, URLExt};
use futures_util::future::join_all;
use tracing::{debug, info_span, warn};
use tracing_futures::Instrument;

/// Outcome of one [`ArangoDb::gather`] cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherSummary {
    /// Endpoints polled this cycle
    pub dispatched: usize,
    /// Endpoints that produced records
    pub succeeded: usize,
    /// Endpoints that reported an error
    pub failed: usize,
    /// Configured URLs that could not be parsed
    pub skipped: usize,
}

/// ArangoDB input. Owns the configuration, everything else lives for a
/// single cycle.
#[derive(Debug, Clone)]
pub struct ArangoDb {
    config: Config,
}

impl ArangoDb {
    /// Create an input from its configuration
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// One line description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        config::DESCRIPTION
    }

    /// Annotated TOML configuration template
    #[must_use]
    pub const fn sample_config(&self) -> &'static str {
        config::SAMPLE_CONFIG
    }

    /// Parse the configured URLs, dropping the ones that don't parse
    fn endpoints(&self) -> (Vec<url::Url>, usize) {
        let mut skipped = 0;
        let urls = self
            .config
            .urls
            .iter()
            .filter_map(|u| match url::Url::parse(u) {
                Ok(url) => Some(url),
                Err(source) => {
                    let err = Error::InvalidUrl {
                        url: u.clone(),
                        source,
                    };
                    warn!("arangodb: {}, skipping", err);
                    skipped += 1;
                    None
                }
            })
            .collect();
        (urls, skipped)
    }

    /// Poll every configured endpoint concurrently and wait for all of them.
    ///
    /// Failures are reported to `acc` one by one. A failing endpoint never
    /// keeps the others from being collected, so the cycle itself can't fail.
    pub async fn gather(&self, acc: &dyn Accumulator) -> GatherSummary {
        let (endpoints, skipped) = self.endpoints();
        let mut summary = GatherSummary {
            skipped,
            ..GatherSummary::default()
        };

        let client = match ClientBuilder::from_config(&self.config)
            .await
            .and_then(|b| b.build())
        {
            Ok(client) => client,
            Err(e) => {
                acc.add_error(e);
                return summary;
            }
        };

        summary.dispatched = endpoints.len();

        let results = join_all(endpoints.iter().map(|url| {
            let span = info_span!("arangodb", url = url.base_str());
            self.gather_url(&client, url, acc).instrument(span)
        }))
        .await;

        for result in results {
            match result {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    summary.failed += 1;
                    acc.add_error(e);
                }
            }
        }

        debug!("arangodb gather finished: {:?}", summary);
        summary
    }

    /// Log in, fetch and emit the three records of a single endpoint
    pub async fn gather_url(
        &self,
        client: &reqwest::Client,
        url: &url::Url,
        acc: &dyn Accumulator,
    ) -> Result<()> {
        let token = auth::login(client, url, &self.config.username, &self.config.password).await?;
        let statistics = stats::fetch(client, url, &token).await?;
        let normalized = normalize::normalize(&statistics).map_err(|e| e.into_error(url))?;

        let tags: Tags = std::iter::once(("url".to_string(), url.base_str().to_string())).collect();
        let now = chrono::Utc::now();

        acc.add_fields(SYSTEM_MEASUREMENT, normalized.system, tags.clone(), now);
        acc.add_fields(SERVER_MEASUREMENT, normalized.server, tags.clone(), now);
        acc.add_fields(CLIENT_MEASUREMENT, normalized.client, tags, now);

        debug!("collected {}", url.base_str());
        Ok(())
    }
}
