//! Error types for HTB Finder
//!
//! Each concern (fetching, caching, reformatting, configuration, argument
//! handling) has its own error enum. They all fold into [`AppError`], which is
//! reported once at the process boundary and mapped to a non-zero exit code.
//!
//! A query that matches nothing is not an error; see
//! [`crate::app::SearchOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching the remote bundle
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Source URL could not be parsed
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Writing the downloaded bytes failed
    #[error("File I/O error during download: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the local bundle cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// A query was attempted before the bundle was ever downloaded
    #[error("No local bundle at {path}. Download it first with -u")]
    Missing { path: PathBuf },

    /// Reading or writing the cache file failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Promoting the temporary download over the cache failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },
}

/// Errors raised by a [`crate::app::Reformatter`]
#[derive(Error, Debug)]
pub enum ReformatError {
    /// External beautifier is not installed
    #[error("Formatter program '{program}' not found. Install it (npm i -g js-beautify) or use --reformatter inline")]
    ProgramNotFound { program: String },

    /// External beautifier could not be started
    #[error("Failed to start formatter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External beautifier exited with a failure status
    #[error("Formatter '{program}' failed with {status}")]
    Failed { program: String, status: String },

    /// Scratch file handling failed
    #[error("Formatter I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Command-line usage errors
#[derive(Error, Debug)]
pub enum CliError {
    /// An action flag was given without its value
    #[error("You must specify {what}")]
    MissingArgument { what: &'static str },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file exists but could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Network failure while fetching the bundle
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Cache error (including a missing cache)
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Reformatting error
    #[error(transparent)]
    Reformat(#[from] ReformatError),

    /// Command-line usage error
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether this is the "query before first download" case
    pub fn is_missing_cache(&self) -> bool {
        matches!(self, AppError::Cache(CacheError::Missing { .. }))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(FetchError::Io(_)) => "io",
            AppError::Fetch(_) => "network",
            AppError::Cache(CacheError::Missing { .. }) => "missing-cache",
            AppError::Cache(_) => "cache",
            AppError::Reformat(_) => "reformat",
            AppError::Cli(CliError::MissingArgument { .. }) => "missing-argument",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Reformat result type alias
pub type ReformatResult<T> = std::result::Result<T, ReformatError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cache_detection() {
        let err = AppError::from(CacheError::Missing {
            path: PathBuf::from("bundle.js"),
        });
        assert!(err.is_missing_cache());
        assert_eq!(err.category(), "missing-cache");
        assert!(err.to_string().contains("bundle.js"));
        assert!(err.to_string().contains("-u"));
    }

    #[test]
    fn test_missing_argument_message() {
        let err = AppError::from(CliError::MissingArgument {
            what: "a difficulty",
        });
        assert!(!err.is_missing_cache());
        assert_eq!(err.category(), "missing-argument");
        assert_eq!(err.to_string(), "You must specify a difficulty");
    }

    #[test]
    fn test_local_write_failure_during_fetch_is_io() {
        let err = AppError::from(FetchError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only directory",
        )));
        assert_eq!(err.category(), "io");
        assert!(err.to_string().contains("read-only directory"));
    }

    #[test]
    fn test_server_error_is_network() {
        let err = AppError::from(FetchError::ServerError { status: 503 });
        assert_eq!(err.category(), "network");
        assert_eq!(err.to_string(), "Server error: HTTP 503");
    }
}
