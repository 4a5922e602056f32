use crate::utils::error::Result;
use crate::utils::validation::is_remote;
use reqwest::Client;
use std::time::Duration;

/// Fetches input documents from either an http(s) URL or a local path.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
    timeout: Duration,
}

impl SourceFetcher {
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if is_remote(location) {
            tracing::debug!("Making HTTP request to: {}", location);
            let response = self
                .client
                .get(location)
                .timeout(self.timeout)
                .send()
                .await?;
            tracing::debug!("HTTP response status: {}", response.status());

            let bytes = response.error_for_status()?.bytes().await?;
            Ok(bytes.to_vec())
        } else {
            tracing::debug!("Reading local file: {}", location);
            Ok(tokio::fs::read(location).await?)
        }
    }
}
