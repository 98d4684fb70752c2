//! HTB Finder Library
//!
//! Downloads the public HTB machines bundle, caches it locally and answers
//! queries by machine name, difficulty, operating system or technique.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;
pub mod report;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
