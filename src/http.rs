//!
//! HTTP client construction
//!
use crate::{Config, Error, Result};
use std::time::Duration;

/// Builder for the short lived [`reqwest::Client`] used in one collection cycle
#[derive(Clone)]
pub struct ClientBuilder {
    timeout: Duration,
    reqwest_ca: Vec<reqwest::Certificate>,
    disable_cert_verification: bool,
}

impl ClientBuilder {
    /// Create a new builder instance with the default 3 second timeout
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            reqwest_ca: Vec::new(),
            disable_cert_verification: false,
        }
    }

    /// Builder configured from the plugin configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        let builder = Self::new().timeout(config.response_timeout);

        let builder = match &config.tls_ca {
            Some(path) => {
                let pem = tokio::fs::read(path)
                    .await
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
                builder.add_root_certificate(&pem)?
            }
            None => builder,
        };

        Ok(if config.insecure_skip_verify {
            builder.danger_accept_invalid_certs()
        } else {
            builder
        })
    }

    /// Per request timeout. Zero means no timeout at all.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Add a root certificate for API certificate verification
    pub fn add_root_certificate(mut self, cert: &[u8]) -> Result<Self> {
        let r_ca = reqwest::Certificate::from_pem(cert).map_err(Error::HTTPClient)?;
        self.reqwest_ca.push(r_ca);
        Ok(self)
    }

    /// Disable certificate verification
    #[must_use]
    pub fn danger_accept_invalid_certs(self) -> Self {
        Self {
            disable_cert_verification: true,
            ..self
        }
    }

    /// Build the client. Idle connections are never pooled, so every request
    /// opens a new connection.
    pub fn build(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder().pool_max_idle_per_host(0);

        let client = self
            .reqwest_ca
            .iter()
            .fold(client, |client, ca| client.add_root_certificate(ca.clone()));

        let client = client.danger_accept_invalid_certs(self.disable_cert_verification);

        let client = if self.timeout.is_zero() {
            tracing::debug!("response timeout is zero, requests will not time out");
            client
        } else {
            client.timeout(self.timeout)
        };

        client.build().map_err(Error::HTTPClient)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("timeout", &self.timeout)
            .field("root_certificates", &self.reqwest_ca.len())
            .field("disable_cert_verification", &self.disable_cert_verification)
            .finish()
    }
}

/// Helpers for building ArangoDB API URLs from a configured base URL
pub trait URLExt {
    /// The URL as used in the `url` tag, without a trailing slash
    fn base_str(&self) -> &str;

    /// `<base><suffix>`, keeping any path prefix of the base
    fn endpoint(&self, suffix: &str) -> String;
}

impl URLExt for url::Url {
    fn base_str(&self) -> &str {
        self.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}{}", self.base_str(), suffix)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn url_ext() {
        let url = url::Url::parse("http://localhost:8529").unwrap();
        assert_eq!(url.base_str(), "http://localhost:8529");
        assert_eq!(url.endpoint("/_open/auth"), "http://localhost:8529/_open/auth");

        let url = url::Url::parse("http://localhost:8529/").unwrap();
        assert_eq!(
            url.endpoint("/_admin/statistics"),
            "http://localhost:8529/_admin/statistics"
        );

        let url = url::Url::parse("https://db.example.com/arango/").unwrap();
        assert_eq!(url.base_str(), "https://db.example.com/arango");
        assert_eq!(
            url.endpoint("/_open/auth"),
            "https://db.example.com/arango/_open/auth"
        );
    }

    #[test]
    fn build_with_zero_timeout() {
        let builder = ClientBuilder::new().timeout(Duration::ZERO);
        assert!(builder.build().is_ok());
    }

    #[tokio::test]
    async fn from_config() {
        let config = Config {
            response_timeout: Duration::from_millis(250),
            insecure_skip_verify: true,
            ..Default::default()
        };
        let builder = ClientBuilder::from_config(&config).await.unwrap();
        assert_eq!(builder.timeout, Duration::from_millis(250));
        assert!(builder.disable_cert_verification);
        assert!(builder.build().is_ok());
    }

    #[tokio::test]
    async fn from_config_missing_ca() {
        let config = Config {
            tls_ca: Some("/nonexistent/ca.pem".into()),
            ..Default::default()
        };
        let err = ClientBuilder::from_config(&config).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
