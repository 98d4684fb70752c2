//! Command-line argument parsing for HTB Finder
//!
//! Actions are single-letter flags rather than subcommands. They are mutually
//! exclusive in practice: when several are given, the first one in the order
//! `-u`, `-m`, `-d`, `-s`, `-t`, `-h` wins. Value flags accept an optional
//! value so that a bare `-d` becomes a "must specify" error instead of a clap
//! usage error.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::app::{Query, ReformatterKind};
use crate::errors::CliError;

/// HTB Finder - search the HTB machines bundle
#[derive(Parser, Debug)]
#[command(
    name = "htb_finder",
    version,
    about = "Search HTB machines by name, difficulty, operating system or technique",
    disable_help_flag = true
)]
pub struct Cli {
    /// Download the bundle, or refresh it if the remote copy changed
    #[arg(short = 'u', long = "update")]
    pub update: bool,

    /// Search by exact machine name
    #[arg(short = 'm', long = "machine", value_name = "NAME", num_args = 0..=1)]
    pub machine: Option<Option<String>>,

    /// Search by difficulty (Fácil, Media, Difícil, Insane)
    #[arg(short = 'd', long = "difficulty", value_name = "LEVEL", num_args = 0..=1)]
    pub difficulty: Option<Option<String>>,

    /// Search by operating system (Linux, Windows)
    #[arg(short = 's', long = "system", value_name = "OS", num_args = 0..=1)]
    pub system: Option<Option<String>>,

    /// Search by technique or skill substring
    #[arg(short = 't', long = "technique", value_name = "SKILL", num_args = 0..=1)]
    pub technique: Option<Option<String>>,

    /// Show the help panel
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every action
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,

    /// Quiet mode - results and errors only, no status lines or progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache file path
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,

    /// Bundle source URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// How downloaded bundles are reformatted
    #[arg(long, value_enum, value_name = "KIND")]
    pub reformatter: Option<ReformatterKind>,
}

/// The single operation selected by the flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Update,
    Search(Query),
    Help,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// Unknown flags are not fatal: they fall back to the help panel.
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Resolve the flags into one action
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingArgument` when the winning flag has no value.
    pub fn action(&self) -> Result<Action, CliError> {
        if self.update {
            return Ok(Action::Update);
        }

        let searches: [(&Option<Option<String>>, &'static str, fn(String) -> Query); 4] = [
            (&self.machine, "a machine name", Query::Name),
            (&self.difficulty, "a difficulty", Query::Difficulty),
            (&self.system, "an operating system", Query::OperatingSystem),
            (&self.technique, "a technique", Query::Skill),
        ];

        for (flag, what, build) in searches {
            if let Some(value) = flag {
                return match value.as_deref().map(str::trim) {
                    Some(term) if !term.is_empty() => Ok(Action::Search(build(term.to_string()))),
                    _ => Err(CliError::MissingArgument { what }),
                };
            }
        }

        Ok(Action::Help)
    }

    /// Get the logging level based on global arguments
    ///
    /// `None` means no flag was given and the configured level applies.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
