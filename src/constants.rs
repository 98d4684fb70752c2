//! Application constants for HTB Finder
//!
//! Centralizes the constants used throughout the application, organized by
//! functional domain.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Overrides the bundle source URL
    pub const SOURCE_URL: &str = "HTB_FINDER_URL";

    /// Overrides the cache file location
    pub const CACHE_PATH: &str = "HTB_FINDER_CACHE";
}

/// Remote data source
pub mod source {
    /// Public bundle listing every machine
    pub const BUNDLE_URL: &str = "https://htbmachines.github.io/bundle.js";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("HTB-Finder/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// File naming
pub mod files {
    /// Cache file name, created in the working directory
    pub const CACHE_FILE_NAME: &str = "bundle.js";

    /// Suffix for in-flight downloads
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Project-local configuration file
    pub const LOCAL_CONFIG_FILE: &str = "htb-finder.toml";

    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "htb-finder";
}

/// Text reformatting
pub mod format {
    /// External beautifier invoked on downloaded bundles
    pub const BEAUTIFIER_PROGRAM: &str = "js-beautify";

    /// Indentation emitted by the in-process formatter
    pub const INDENT: &str = "    ";
}

/// Tokens recognised by the record extractor
pub mod fields {
    pub const NAME: &str = "name:";
    pub const IP: &str = "ip:";
    pub const OPERATING_SYSTEM: &str = "so:";
    pub const SKILLS: &str = "skills:";
    pub const DIFFICULTY: &str = "dificultad:";

    /// Last field of every machine block; ends a name lookup
    pub const TERMINATOR: &str = "resuelta:";

    /// Internal fields hidden from name lookup output
    pub const HIDDEN: [&str; 3] = ["id:", "sku:", TERMINATOR];

    /// Record blocks close on any line containing this character
    pub const BLOCK_CLOSE: char = '}';
}

/// Console presentation
pub mod display {
    /// Width of the separator printed after each record
    pub const SEPARATOR_WIDTH: usize = 50;

    /// Placeholder for fields a record does not carry
    pub const MISSING_FIELD: &str = "N/A";

    /// Spinner frames
    pub const SPINNER_TICKS: [&str; 4] = ["◐", "◓", "◑", "◒"];

    /// Spinner tick interval in milliseconds
    pub const SPINNER_INTERVAL_MS: u64 = 120;
}
