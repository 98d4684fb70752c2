//! Prelude module for HTB Finder Library
//!
//! Re-exports the items needed for typical library usage with a single
//! `use htb_finder::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use htb_finder::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let text = BundleCache::new("bundle.js").read().await?;
//!     let outcome = search(&text, &Query::OperatingSystem("Linux".into()));
//!     println!("found: {}", outcome.is_found());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components
pub use crate::app::{
    search, BundleCache, BundleClient, ClientConfig, InlineFormatter, MachineRecord, Md5Hash,
    Query, Reformatter, SearchOutcome, UpdateOutcome,
};

// Configuration and reporting
pub use crate::config::AppConfig;
pub use crate::report::{ConsoleReporter, MemoryReporter, Reporter};

// Common external crate re-exports for convenience
pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _config = AppConfig::default();
        let _client_config = ClientConfig::default();
        let reporter = MemoryReporter::new();
        reporter.info("prelude");
        assert_eq!(reporter.entries().len(), 1);
    }

    #[test]
    fn test_prelude_search_pattern() {
        let text = "name: \"Lame\",\nso: \"Linux\",\n}";
        let outcome = search(text, &Query::OperatingSystem("linux".into()));
        assert!(outcome.is_found());
    }
}
