//!
//! Types and request for `/_admin/statistics`
//!
//! NOTE: The types only cover the fields that are turned into metrics. Every
//! field defaults to zero when the server leaves it out.
use crate::{Error, Result, URLExt};
use serde::Deserialize;

const STATS_POSTFIX: &str = "/_admin/statistics";

/// Process level statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemStats {
    pub major_page_faults: u32,
    pub minor_page_faults: u32,
    pub number_of_threads: u32,
    pub resident_size: f64,
    pub system_time: f64,
    pub user_time: f64,
    pub virtual_size: u64,
}

/// Host level statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerStats {
    pub physical_memory: u64,
    /// Seconds since the server started
    pub uptime: f64,
}

/// Request time distribution
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RequestTime {
    /// Number of requests
    #[serde(rename = "requestTime", alias = "count")]
    pub count: u32,
    /// Histogram bucket counts, ordered by bucket bound
    pub counts: Vec<u32>,
    /// Total request time
    pub sum: f64,
}

/// Client connection statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientStats {
    pub request_time: RequestTime,
}

/// Returned from `/_admin/statistics`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub system: SystemStats,
    pub server: ServerStats,
    pub client: ClientStats,
}

/// GET the statistics of one endpoint using a token from [`crate::auth::login`]
pub async fn fetch(
    client: &reqwest::Client,
    base_url: &url::Url,
    token: &str,
) -> Result<Statistics> {
    let url = base_url.base_str();

    tracing::debug!("GET {}", base_url.endpoint(STATS_POSTFIX));

    let result = client
        .get(base_url.endpoint(STATS_POSTFIX))
        .bearer_auth(token)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| Error::Connectivity {
            url: url.to_string(),
            source,
        })?;

    let status = result.status();
    let body = result.bytes().await.map_err(|source| Error::Connectivity {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        tracing::error!("statistics request to {} failed with {}", url, status);
        return Err(Error::WebServer {
            url: url.to_string(),
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    serde_json::from_slice(&body).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}
