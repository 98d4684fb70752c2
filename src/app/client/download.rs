//! Streaming download of the bundle to disk
//!
//! Bytes are written chunk by chunk as they arrive, and a
//! [`DownloadProgress`] snapshot is reported after every chunk.

use std::path::Path;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::errors::{FetchError, FetchResult};

/// Cumulative transfer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes written so far
    pub downloaded: u64,
    /// Advertised length; `None` when the server sent none (or zero)
    pub total: Option<u64>,
}

impl DownloadProgress {
    pub fn new(downloaded: u64, total: Option<u64>) -> Self {
        Self {
            downloaded,
            total: total.filter(|len| *len > 0),
        }
    }

    /// Completed fraction in `0.0..=1.0`, if the total is known
    pub fn fraction(&self) -> Option<f64> {
        self.total
            .map(|total| (self.downloaded as f64 / total as f64).min(1.0))
    }

    /// Human readable status, bytes only when the total is unknown
    pub fn status(&self) -> String {
        match (self.total, self.fraction()) {
            (Some(total), Some(fraction)) => format!(
                "{}/{} bytes ({:.1}%)",
                self.downloaded,
                total,
                fraction * 100.0
            ),
            _ => format!("{} bytes", self.downloaded),
        }
    }
}

/// File download operations handler
pub struct DownloadHandler<'a> {
    client: &'a Client,
}

impl<'a> DownloadHandler<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Stream `url` into `destination`, overwriting it
    ///
    /// On failure the partially written file is removed, so callers can treat
    /// a failed fetch as a no-op. Returns the number of bytes written.
    pub async fn download_to<F>(
        &self,
        url: &Url,
        destination: &Path,
        on_progress: F,
    ) -> FetchResult<u64>
    where
        F: FnMut(DownloadProgress),
    {
        match self.download_attempt(url, destination, on_progress).await {
            Ok(written) => {
                tracing::info!(
                    "Downloaded {} bytes to {}",
                    written,
                    destination.display()
                );
                Ok(written)
            }
            Err(e) => {
                if destination.exists() {
                    let _ = tokio::fs::remove_file(destination).await;
                }
                tracing::error!("Download of {} failed: {}", url, e);
                Err(e)
            }
        }
    }

    async fn download_attempt<F>(
        &self,
        url: &Url,
        destination: &Path,
        mut on_progress: F,
    ) -> FetchResult<u64>
    where
        F: FnMut(DownloadProgress),
    {
        let response = self.client.get(url.as_str()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::ServerError {
                status: response.status().as_u16(),
            });
        }

        let total = response.content_length();
        tracing::debug!("Fetching {} (content length: {:?})", url, total);

        let mut file = File::create(destination).await?;
        let mut downloaded: u64 = 0;
        on_progress(DownloadProgress::new(downloaded, total));

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            on_progress(DownloadProgress::new(downloaded, total));
        }

        file.flush().await?;
        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_with_known_total() {
        let progress = DownloadProgress::new(512, Some(1024));
        assert_eq!(progress.fraction(), Some(0.5));
        assert_eq!(progress.status(), "512/1024 bytes (50.0%)");
    }

    #[test]
    fn test_progress_without_total_reports_bytes_only() {
        let progress = DownloadProgress::new(2048, None);
        assert_eq!(progress.fraction(), None);
        assert_eq!(progress.status(), "2048 bytes");
    }

    #[test]
    fn test_progress_zero_total_is_unknown() {
        let progress = DownloadProgress::new(100, Some(0));
        assert_eq!(progress.total, None);
        assert_eq!(progress.fraction(), None);
        assert_eq!(progress.status(), "100 bytes");
    }

    #[test]
    fn test_progress_fraction_is_clamped() {
        let progress = DownloadProgress::new(3000, Some(1000));
        assert_eq!(progress.fraction(), Some(1.0));
    }
}
