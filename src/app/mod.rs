//! Core application logic for HTB Finder
//!
//! Leaf to root: the HTTP client fetches the bundle, a reformatter lays it out
//! one key per line, the cache detects changes by hash, and the extractor and
//! query filters answer searches over the cached text.
//!
//! # Examples
//!
//! ```rust,no_run
//! use htb_finder::app::{search, BundleCache, Query, SearchOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let text = BundleCache::new("bundle.js").read().await?;
//!
//! if let SearchOutcome::Records(machines) = search(&text, &Query::Skill("SQLi".into())) {
//!     for machine in machines {
//!         println!("{:?}", machine.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod extract;
pub mod hash;
pub mod models;
pub mod query;
pub mod reformat;

// Re-export main public API
pub use cache::{BundleCache, UpdateEvent, UpdateOutcome};
pub use client::{BundleClient, ClientConfig, DownloadProgress};
pub use extract::{find_machine_block, records, RecordScanner};
pub use hash::Md5Hash;
pub use models::{DifficultyTier, FieldTag, MachineRecord};
pub use query::{search, Query, SearchOutcome};
pub use reformat::{AutoReformatter, ExternalBeautifier, InlineFormatter, Reformatter, ReformatterKind};
