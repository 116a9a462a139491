//!
//! Plugin configuration
//!
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Plugin description shown by hosts listing their inputs
pub const DESCRIPTION: &str = "Read metrics from an ArangoDB server";

/// Annotated configuration template
pub const SAMPLE_CONFIG: &str = r#"
  ## An array of urls endpoints to get results from
  urls = ["http://localhost:8529"]

  ## Specify timeout duration for slower connections
  # response_timeout = "3s"

  username = "root"
  password = "root"

  ## Optional PEM encoded CA used to verify https endpoints
  # tls_ca = "/etc/arangodb/ca.pem"
  # insecure_skip_verify = false
"#;

const DEFAULT_URL: &str = "http://localhost:8529";
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for one [`crate::ArangoDb`] instance. It is never mutated
/// while a collection cycle runs.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint base URLs, polled independently
    pub urls: Vec<String>,
    /// Per request timeout, zero disables the timeout
    #[serde(with = "humantime_serde")]
    pub response_timeout: Duration,
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
    /// PEM file with an additional root certificate
    pub tls_ca: Option<PathBuf>,
    /// Disable certificate verification
    pub insecure_skip_verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: vec![DEFAULT_URL.to_string()],
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            username: String::new(),
            password: String::new(),
            tls_ca: None,
            insecure_skip_verify: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("urls", &self.urls)
            .field("response_timeout", &self.response_timeout)
            .field("username", &self.username)
            .field("tls_ca", &self.tls_ca)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "config")]
impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> crate::Result<Self> {
        toml::from_str(s).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Load a TOML file
    pub async fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }
}
