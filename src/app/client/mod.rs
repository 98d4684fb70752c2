//! HTTP client for the remote machines bundle
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building
//! - `download`: streaming download to disk with progress reporting
//!
//! There are no retries: a failed transfer is reported and the user re-runs
//! the update.

use std::path::Path;

use reqwest::Client;
use url::Url;

use crate::errors::{FetchError, FetchResult};

pub mod config;
pub mod download;

pub use config::ClientConfig;
pub use download::{DownloadHandler, DownloadProgress};

/// Client bound to one bundle URL
#[derive(Debug, Clone)]
pub struct BundleClient {
    client: Client,
    url: Url,
}

impl BundleClient {
    /// Creates a client for `url` with default configuration
    pub fn new(url: &str) -> FetchResult<Self> {
        Self::with_config(url, &ClientConfig::default())
    }

    /// Creates a client for `url` with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the URL does not parse, or
    /// `FetchError::Http` if the HTTP client cannot be built.
    pub fn with_config(url: &str, config: &ClientConfig) -> FetchResult<Self> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;
        let client = config.build_http_client()?;

        tracing::debug!("Created bundle client for {}", url);
        Ok(Self { client, url })
    }

    /// Download the bundle into `destination`
    pub async fn download_to<F>(&self, destination: &Path, on_progress: F) -> FetchResult<u64>
    where
        F: FnMut(DownloadProgress),
    {
        DownloadHandler::new(&self.client)
            .download_to(&self.url, destination, on_progress)
            .await
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
