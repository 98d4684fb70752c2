//! Local cache of the machines bundle
//!
//! A single text file holds the reformatted bundle. It is created on the
//! first download, replaced when a later download hashes differently, and
//! read-only otherwise.
//!
//! # Examples
//!
//! ```rust,no_run
//! use htb_finder::app::{BundleCache, BundleClient, InlineFormatter, UpdateOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = BundleCache::new("bundle.js");
//! let client = BundleClient::new("https://htbmachines.github.io/bundle.js")?;
//!
//! match cache.update(&client, &InlineFormatter, |_| {}).await? {
//!     UpdateOutcome::Unchanged { .. } => println!("No updates"),
//!     outcome => println!("Cache now at {}", outcome.current_hash()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod manager;

pub use manager::{BundleCache, UpdateEvent, UpdateOutcome};
