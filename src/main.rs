//! HTB Finder CLI application
//!
//! Downloads the HTB machines bundle and searches it by name, difficulty,
//! operating system or technique.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use htb_finder::cli::{load_config_for, run_action, show_help, Cli, Context};
use htb_finder::config::AppConfig;
use htb_finder::errors::Result;
use htb_finder::report::{ConsoleReporter, Reporter};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = match Cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayVersion => {
                print!("{}", e);
                return;
            }
            // Unknown or malformed flags fall back to the help panel
            _ => {
                show_help(&ConsoleReporter::new());
                return;
            }
        },
    };

    let reporter = ConsoleReporter::new();
    if let Err(e) = run(cli, &reporter).await {
        debug!("Failed with {} error", e.category());
        reporter.failure(&e.to_string());
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli, reporter: &dyn Reporter) -> Result<()> {
    let action = cli.action()?;
    let Some(config) = load_config_for(&action, &cli.global).await? else {
        show_help(reporter);
        return Ok(());
    };

    init_logging(&cli, &config);
    info!("HTB Finder v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = Context::new(config, reporter).quiet(cli.global.quiet);

    run_action(action, &ctx).await
}

/// Initialize logging based on verbosity flags, then the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("htb_finder={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(cli.global.very_verbose)
        .try_init();
}
