use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::{parser, SourceBatch};
use crate::config::RemoteSourceConfig;

/// Failure to obtain candidate records from the remote location.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("remote body is not readable candidate CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Transport seam so the merger can be exercised without a network.
pub trait RecordFetcher: Send + Sync {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher. A client is built per call so that it is always
/// created and dropped on the calling (blocking) thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl RecordFetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let transport = |err: reqwest::Error| {
            if err.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    reason: err.to_string(),
                }
            }
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;

        let response = client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(transport)
    }
}

/// Remote candidate CSV reachable at a primary and a fallback location.
pub struct RemoteCandidateSource<F> {
    config: RemoteSourceConfig,
    fetcher: Arc<F>,
}

impl<F: RecordFetcher> RemoteCandidateSource<F> {
    pub fn new(config: RemoteSourceConfig, fetcher: Arc<F>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &RemoteSourceConfig {
        &self.config
    }

    /// Fetch the primary location, retrying once against the fallback.
    pub fn load(&self) -> Result<SourceBatch, FetchError> {
        let timeout = self.config.timeout;
        let body = match self.fetcher.fetch(&self.config.primary_url, timeout) {
            Ok(body) => body,
            Err(primary_err) => {
                warn!(error = %primary_err, fallback = %self.config.fallback_url, "primary candidate source failed, trying fallback");
                self.fetcher.fetch(&self.config.fallback_url, timeout)?
            }
        };

        Ok(parser::parse_batch(body.as_bytes())?)
    }
}
