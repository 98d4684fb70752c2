//! Command handlers for HTB Finder CLI
//!
//! Each handler runs one operation end to end and reports through the
//! context's [`Reporter`]. Errors are returned, not printed; `main` reports
//! them once and sets the exit code.

use tracing::{debug, info};

use crate::app::{search, BundleClient, Query, SearchOutcome, UpdateOutcome};
use crate::cli::args::{Action, GlobalArgs};
use crate::cli::presenter::Presenter;
use crate::cli::progress::{spinner, TransferProgress};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::report::Reporter;

/// Everything an operation needs
pub struct Context<'a> {
    pub config: AppConfig,
    pub reporter: &'a dyn Reporter,
    /// Draw progress bars and spinners
    pub show_progress: bool,
    /// Skip status lines; results and errors still print
    pub quiet: bool,
}

impl<'a> Context<'a> {
    pub fn new(config: AppConfig, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            reporter,
            show_progress: true,
            quiet: false,
        }
    }

    /// Quiet mode also disables progress drawing
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        if quiet {
            self.show_progress = false;
        }
        self
    }

    /// Disable progress drawing (tests, quiet mode)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn presenter(&self) -> Presenter<'_> {
        Presenter::new(self.reporter).quiet(self.quiet)
    }
}

/// Load the configuration `action` needs
///
/// Help needs none and returns `None` without touching any config file, so a
/// broken config never hides the help panel.
pub async fn load_config_for(action: &Action, global: &GlobalArgs) -> Result<Option<AppConfig>> {
    if *action == Action::Help {
        return Ok(None);
    }
    let mut config = AppConfig::load(global.config.as_deref()).await?;
    apply_cli_overrides(&mut config, global);
    Ok(Some(config))
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_cli_overrides(config: &mut AppConfig, global: &GlobalArgs) {
    if let Some(url) = &global.url {
        config.source.url = url.clone();
    }
    if let Some(path) = &global.cache_file {
        config.cache.path = path.clone();
    }
    if let Some(kind) = global.reformatter {
        config.format.reformatter = kind;
    }
}

/// Run the selected action
pub async fn run_action(action: Action, ctx: &Context<'_>) -> Result<()> {
    match action {
        Action::Update => {
            info!("Executing update");
            handle_update(ctx).await.map(|_| ())
        }
        Action::Search(query) => {
            info!("Executing search by {}", query);
            handle_search(ctx, &query).await.map(|_| ())
        }
        Action::Help => {
            show_help(ctx.reporter);
            Ok(())
        }
    }
}

/// Print the help panel
pub fn show_help(reporter: &dyn Reporter) {
    Presenter::new(reporter).help_panel();
}

/// Download the bundle, or replace it when the remote copy changed
pub async fn handle_update(ctx: &Context<'_>) -> Result<UpdateOutcome> {
    let cache = ctx.config.bundle_cache();
    let client_config = ctx.config.client.to_runtime_config()?;
    let client = BundleClient::with_config(&ctx.config.source.url, &client_config)?;
    let reformatter = ctx.config.format.build();

    ctx.presenter().update_started(cache.exists());
    debug!(
        "Updating {} from {} using {}",
        cache.path().display(),
        client.url(),
        reformatter.name()
    );

    let mut progress = TransferProgress::new(ctx.show_progress);
    let result = cache
        .update(&client, reformatter.as_ref(), |event| progress.observe(event))
        .await;
    progress.finish();

    let outcome = result?;
    ctx.presenter().update_finished(&outcome);
    Ok(outcome)
}

/// Run a search over the cached bundle
///
/// A search that matches nothing is a successful, empty result.
pub async fn handle_search(ctx: &Context<'_>, query: &Query) -> Result<SearchOutcome> {
    let cache = ctx.config.bundle_cache();
    let text = cache.read().await?;

    let presenter = ctx.presenter();
    presenter.searching(query);

    let scanning = spinner("Analyzing machines...", ctx.show_progress);
    let outcome = search(&text, query);
    scanning.finish_and_clear();

    presenter.results(query, &outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ReformatterKind;
    use crate::report::{Level, MemoryReporter};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const BUNDLE: &str = "{\n    name: \"Lame\",\n    so: \"Linux\",\n    dificultad: \"Fácil\",\n    skills: \"SMB enum\",\n    resuelta: !0\n},\n{\n    name: \"Blue\",\n    so: \"Windows\",\n    dificultad: \"Fácil\",\n    skills: \"SMB, EternalBlue\",\n    resuelta: !0\n}\n";

    fn config_in(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.cache.path = dir.path().join("bundle.js");
        config
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        let global = GlobalArgs {
            cache_file: Some(PathBuf::from("/tmp/other.js")),
            url: Some("http://localhost/b.js".to_string()),
            reformatter: Some(ReformatterKind::Inline),
            ..Default::default()
        };
        apply_cli_overrides(&mut config, &global);

        assert_eq!(config.cache.path, PathBuf::from("/tmp/other.js"));
        assert_eq!(config.source.url, "http://localhost/b.js");
        assert_eq!(config.format.reformatter, ReformatterKind::Inline);
    }

    #[tokio::test]
    async fn test_search_without_cache_reports_missing() {
        let dir = TempDir::new().unwrap();
        let reporter = MemoryReporter::new();
        let ctx = Context::new(config_in(&dir), &reporter).without_progress();

        let queries = [
            Query::Name("Lame".into()),
            Query::Difficulty("Fácil".into()),
            Query::OperatingSystem("Linux".into()),
            Query::Skill("smb".into()),
        ];
        for query in &queries {
            let err = handle_search(&ctx, query).await.unwrap_err();
            assert!(err.is_missing_cache(), "{}", query);
        }
        // Nothing was searched or printed
        assert!(reporter.entries().is_empty());
        assert!(!ctx.config.cache.path.exists());
    }

    #[tokio::test]
    async fn test_quiet_search_prints_results_only() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        tokio::fs::write(&config.cache.path, BUNDLE).await.unwrap();
        let reporter = MemoryReporter::new();
        let ctx = Context::new(config, &reporter).quiet(true);
        assert!(!ctx.show_progress);

        handle_search(&ctx, &Query::Difficulty("fácil".into()))
            .await
            .unwrap();

        assert!(!reporter.contains("Searching"));
        assert!(!reporter.contains("Difficulty levels:"));
        assert_eq!(reporter.messages(Level::Success)[0], "Results (2 machines):");
        assert!(reporter.contains("Name: Blue"));
    }

    #[tokio::test]
    async fn test_help_ignores_broken_config() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("htb-finder.toml");
        tokio::fs::write(&broken, "[format\nreformatter = ").await.unwrap();
        let global = GlobalArgs {
            config: Some(broken),
            ..Default::default()
        };

        assert!(load_config_for(&Action::Help, &global).await.unwrap().is_none());

        let err = load_config_for(&Action::Search(Query::Name("Lame".into())), &global)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[tokio::test]
    async fn test_load_config_applies_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("htb-finder.toml");
        tokio::fs::write(&file, "[cache]\npath = \"from-file.js\"\n")
            .await
            .unwrap();
        let global = GlobalArgs {
            config: Some(file),
            cache_file: Some(dir.path().join("from-cli.js")),
            ..Default::default()
        };

        let config = load_config_for(&Action::Update, &global)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(config.cache.path, dir.path().join("from-cli.js"));
    }

    #[tokio::test]
    async fn test_search_by_os_and_skill() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        tokio::fs::write(&config.cache.path, BUNDLE).await.unwrap();
        let reporter = MemoryReporter::new();
        let ctx = Context::new(config, &reporter).without_progress();

        match handle_search(&ctx, &Query::OperatingSystem("windows".into()))
            .await
            .unwrap()
        {
            SearchOutcome::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].name.as_deref(), Some("Blue"));
            }
            other => panic!("Expected records, got {:?}", other),
        }

        match handle_search(&ctx, &Query::Skill("smb".into())).await.unwrap() {
            SearchOutcome::Records(records) => {
                let names: Vec<_> = records.iter().filter_map(|r| r.name.as_deref()).collect();
                assert_eq!(names, ["Lame", "Blue"]);
            }
            other => panic!("Expected records, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_not_found_is_ok() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        tokio::fs::write(&config.cache.path, BUNDLE).await.unwrap();
        let reporter = MemoryReporter::new();
        let ctx = Context::new(config, &reporter).without_progress();

        let outcome = handle_search(&ctx, &Query::Difficulty("Insane".into()))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert!(reporter
            .messages(Level::Warn)
            .contains(&"No machines found with difficulty Insane".to_string()));
    }

    #[tokio::test]
    async fn test_help_action() {
        let dir = TempDir::new().unwrap();
        let reporter = MemoryReporter::new();
        let ctx = Context::new(config_in(&dir), &reporter).without_progress();

        run_action(Action::Help, &ctx).await.unwrap();
        assert!(reporter.contains("-m <name>"));
    }

    #[tokio::test]
    async fn test_update_with_invalid_url_leaves_no_files() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.source.url = "not a url".to_string();
        let reporter = MemoryReporter::new();
        let ctx = Context::new(config, &reporter).without_progress();

        let err = handle_update(&ctx).await.unwrap_err();
        assert_eq!(err.category(), "network");
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
