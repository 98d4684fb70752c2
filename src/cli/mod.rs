//! Command-line interface components
//!
//! Argument parsing, operation handlers, result presentation and progress
//! display for the HTB Finder binary.

pub mod args;
pub mod commands;
pub mod presenter;
pub mod progress;

pub use args::{Action, Cli, GlobalArgs};
pub use commands::{
    apply_cli_overrides, handle_search, handle_update, load_config_for, run_action, show_help,
    Context,
};
pub use presenter::Presenter;
pub use progress::TransferProgress;
