//! Bundle cache with hash-based change detection
//!
//! Updates always land in a temporary file next to the cache. The temporary
//! file is reformatted, hashed and either promoted over the cache with a
//! rename or discarded when nothing changed.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::app::client::{BundleClient, DownloadProgress};
use crate::app::hash::Md5Hash;
use crate::app::reformat::Reformatter;
use crate::constants::files;
use crate::errors::{CacheError, CacheResult, Result};

/// What an update did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No cache existed; the bundle was downloaded for the first time
    Created { hash: Md5Hash },
    /// The remote bundle matches the cached one
    Unchanged { hash: Md5Hash },
    /// The cache was replaced with a newer bundle
    Updated { previous: Md5Hash, current: Md5Hash },
}

impl UpdateOutcome {
    /// Hash of the bundle now in the cache
    pub fn current_hash(&self) -> Md5Hash {
        match self {
            UpdateOutcome::Created { hash } | UpdateOutcome::Unchanged { hash } => *hash,
            UpdateOutcome::Updated { current, .. } => *current,
        }
    }
}

/// Phases reported while an update runs
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    /// Bytes arrived
    Download(DownloadProgress),
    /// Download finished; the reformatter is running
    Reformatting { formatter: String },
}

/// The single cached bundle file
#[derive(Debug, Clone)]
pub struct BundleCache {
    path: PathBuf,
}

impl BundleCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch path used while an update is in flight
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(files::TEMP_FILE_SUFFIX);
        self.path.with_file_name(name)
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the cached bundle
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Missing` if the bundle was never downloaded.
    pub async fn read(&self) -> CacheResult<String> {
        if !self.exists() {
            return Err(CacheError::Missing {
                path: self.path.clone(),
            });
        }
        let text = fs::read_to_string(&self.path).await?;
        debug!("Read {} bytes from {}", text.len(), self.path.display());
        Ok(text)
    }

    /// Hash of the cached bundle, if there is one
    pub async fn current_hash(&self) -> CacheResult<Option<Md5Hash>> {
        if !self.exists() {
            return Ok(None);
        }
        Ok(Some(Md5Hash::of_file(&self.path).await?))
    }

    /// Fetch the remote bundle and replace the cache if it changed
    ///
    /// On any failure the temporary file is removed and the cache is left as
    /// it was.
    pub async fn update<F>(
        &self,
        client: &BundleClient,
        reformatter: &dyn Reformatter,
        mut on_event: F,
    ) -> Result<UpdateOutcome>
    where
        F: FnMut(UpdateEvent),
    {
        let temp_path = self.temp_path();
        let result = self
            .update_via(&temp_path, client, reformatter, &mut on_event)
            .await;

        if result.is_err() && temp_path.exists() {
            if let Err(e) = fs::remove_file(&temp_path).await {
                warn!("Could not remove {}: {}", temp_path.display(), e);
            }
        }
        result
    }

    async fn update_via<F>(
        &self,
        temp_path: &Path,
        client: &BundleClient,
        reformatter: &dyn Reformatter,
        on_event: &mut F,
    ) -> Result<UpdateOutcome>
    where
        F: FnMut(UpdateEvent),
    {
        let previous = self.current_hash().await?;
        info!(
            "Fetching {} into {} (cached: {})",
            client.url(),
            temp_path.display(),
            previous.is_some()
        );

        client
            .download_to(temp_path, |progress| on_event(UpdateEvent::Download(progress)))
            .await?;

        on_event(UpdateEvent::Reformatting {
            formatter: reformatter.name().to_string(),
        });
        let raw = fs::read_to_string(temp_path).await.map_err(CacheError::Io)?;
        let formatted = reformatter.reformat(&raw).await?;
        fs::write(temp_path, &formatted)
            .await
            .map_err(CacheError::Io)?;
        let current = Md5Hash::compute(formatted.as_bytes());

        let outcome = match previous {
            Some(previous) if previous == current => {
                fs::remove_file(temp_path).await.map_err(CacheError::Io)?;
                UpdateOutcome::Unchanged { hash: current }
            }
            Some(previous) => {
                self.promote(temp_path).await?;
                UpdateOutcome::Updated { previous, current }
            }
            None => {
                self.promote(temp_path).await?;
                UpdateOutcome::Created { hash: current }
            }
        };

        info!("Update finished: {:?}", outcome);
        Ok(outcome)
    }

    async fn promote(&self, temp_path: &Path) -> CacheResult<()> {
        fs::rename(temp_path, &self.path)
            .await
            .map_err(|_| CacheError::AtomicOperationFailed {
                temp_path: temp_path.to_path_buf(),
                final_path: self.path.clone(),
            })
    }
}
