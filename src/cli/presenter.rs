//! Console formatting of search results and panels
//!
//! All output goes through a [`Reporter`], never straight to stdout.

use crate::app::{DifficultyTier, MachineRecord, Query, SearchOutcome, UpdateOutcome};
use crate::constants::display;
use crate::report::{Level, Reporter};

/// Formats results for one reporter
pub struct Presenter<'a> {
    reporter: &'a dyn Reporter,
    quiet: bool,
}

impl<'a> Presenter<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            reporter,
            quiet: false,
        }
    }

    /// Drop status lines, keep results
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Print the help panel
    pub fn help_panel(&self) {
        let r = self.reporter;
        r.info("Help panel");
        r.indented("-u                 Download the bundle or check for updates");
        r.indented("-m <name>          Search by machine name");
        r.indented("-d <difficulty>    Search by difficulty (Fácil, Media, Difícil, Insane)");
        r.indented("-s <system>        Search by operating system (Linux, Windows)");
        r.indented("-t <technique>     Search by technique or skill");
        r.indented("-h                 Show this panel");
        r.info("Global options");
        r.indented("-v, --verbose / --very-verbose / -q, --quiet");
        r.indented("--config <FILE>    Configuration file");
        r.indented("--cache-file <FILE> Cache file (default: bundle.js)");
        r.indented("--url <URL>        Bundle source URL");
        r.indented("--reformatter <auto|external|inline>");
    }

    /// Announce a search before it runs
    pub fn searching(&self, query: &Query) {
        if self.quiet {
            return;
        }
        if let Query::Difficulty(_) = query {
            self.difficulty_legend();
        }
        match query {
            Query::Name(name) => self.reporter.info(&format!("Searching for machine {}", name)),
            other => self
                .reporter
                .info(&format!("Searching machines with {}", other)),
        }
    }

    /// Print each difficulty tier in its severity colour
    pub fn difficulty_legend(&self) {
        self.reporter.info("Difficulty levels:");
        for tier in DifficultyTier::ALL {
            self.reporter
                .emit(tier_level(Some(tier)), &format!("- {}", tier));
        }
    }

    /// Print the outcome of `query`
    pub fn results(&self, query: &Query, outcome: &SearchOutcome) {
        match outcome {
            SearchOutcome::Block(lines) => {
                self.reporter
                    .success(&format!("Results for {}:", query.term()));
                for line in lines {
                    self.reporter.indented(line);
                }
            }
            SearchOutcome::Records(records) => {
                self.reporter
                    .success(&format!("Results ({} machines):", records.len()));
                for record in records {
                    self.record(query, record);
                    self.reporter.indented(&"-".repeat(display::SEPARATOR_WIDTH));
                }
            }
            SearchOutcome::NotFound => self.not_found(query),
        }
    }

    fn record(&self, query: &Query, record: &MachineRecord) {
        let r = self.reporter;
        let name = format!("Name: {}", field(&record.name));
        let os = format!("OS: {}", field(&record.operating_system));
        let difficulty = format!("Difficulty: {}", field(&record.difficulty));
        let difficulty_level = tier_level(record.tier());

        match query {
            Query::Difficulty(_) => {
                r.info(&name);
                r.emit(difficulty_level, &difficulty);
                r.info(&os);
            }
            Query::OperatingSystem(_) => {
                r.info(&name);
                r.info(&os);
                r.emit(difficulty_level, &difficulty);
            }
            Query::Skill(_) | Query::Name(_) => {
                r.info(&name);
                r.info(&format!("IP: {}", field(&record.ip)));
                r.info(&os);
                r.emit(difficulty_level, &difficulty);
                r.info(&format!("Skills: {}", field(&record.skills)));
            }
        }
    }

    fn not_found(&self, query: &Query) {
        let message = match query {
            Query::Name(name) => format!("Machine {} not found", name),
            Query::Difficulty(level) => format!("No machines found with difficulty {}", level),
            Query::OperatingSystem(os) => format!("No machines found with operating system {}", os),
            Query::Skill(skill) => format!("No machines found with technique {}", skill),
        };
        self.reporter.warn(&message);
    }

    /// Announce the start of an update
    pub fn update_started(&self, cached: bool) {
        if self.quiet {
            return;
        }
        if cached {
            self.reporter.info("Checking for updates...");
        } else {
            self.reporter.info("Downloading bundle for the first time...");
        }
    }

    /// Print the outcome of an update
    pub fn update_finished(&self, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::Created { hash } => self
                .reporter
                .success(&format!("Bundle downloaded and formatted (md5 {})", hash)),
            UpdateOutcome::Unchanged { .. } => self.reporter.success("No updates available"),
            UpdateOutcome::Updated { previous, current } => self.reporter.success(&format!(
                "Bundle updated (md5 {} -> {})",
                previous, current
            )),
        }
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(display::MISSING_FIELD)
}

fn tier_level(tier: Option<DifficultyTier>) -> Level {
    match tier {
        Some(DifficultyTier::Easy) => Level::Success,
        Some(DifficultyTier::Hard) => Level::Warn,
        Some(DifficultyTier::Insane) => Level::Failure,
        Some(DifficultyTier::Medium) | None => Level::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;

    fn blue() -> MachineRecord {
        MachineRecord {
            name: Some("Blue".into()),
            ip: Some("10.10.10.40".into()),
            operating_system: Some("Windows".into()),
            skills: Some("SMB, EternalBlue".into()),
            difficulty: Some("Fácil".into()),
        }
    }

    #[test]
    fn test_skill_results_include_every_field() {
        let reporter = MemoryReporter::new();
        let query = Query::Skill("smb".into());
        Presenter::new(&reporter).results(&query, &SearchOutcome::Records(vec![blue()]));

        assert_eq!(reporter.messages(Level::Success)[0], "Results (1 machines):");
        let info = reporter.messages(Level::Info);
        assert!(info.contains(&"Name: Blue".to_string()));
        assert!(info.contains(&"IP: 10.10.10.40".to_string()));
        assert!(info.contains(&"Skills: SMB, EternalBlue".to_string()));
        // Fácil is coloured as success
        assert!(reporter
            .messages(Level::Success)
            .contains(&"Difficulty: Fácil".to_string()));
        assert_eq!(reporter.messages(Level::Indented), vec!["-".repeat(50)]);
    }

    #[test]
    fn test_os_results_use_placeholder_for_missing_fields() {
        let reporter = MemoryReporter::new();
        let record = MachineRecord {
            name: Some("Mystery".into()),
            operating_system: Some("Linux".into()),
            ..Default::default()
        };
        Presenter::new(&reporter).results(
            &Query::OperatingSystem("linux".into()),
            &SearchOutcome::Records(vec![record]),
        );

        assert!(reporter.contains("Difficulty: N/A"));
        assert!(!reporter.contains("Skills:"));
    }

    #[test]
    fn test_block_results() {
        let reporter = MemoryReporter::new();
        let outcome = SearchOutcome::Block(vec!["ip: 10.10.10.3".into(), "so: Linux".into()]);
        Presenter::new(&reporter).results(&Query::Name("Lame".into()), &outcome);

        assert_eq!(reporter.messages(Level::Success), vec!["Results for Lame:"]);
        assert_eq!(
            reporter.messages(Level::Indented),
            vec!["ip: 10.10.10.3", "so: Linux"]
        );
    }

    #[test]
    fn test_not_found_messages_are_distinct() {
        let queries = [
            Query::Name("X".into()),
            Query::Difficulty("X".into()),
            Query::OperatingSystem("X".into()),
            Query::Skill("X".into()),
        ];
        let reporter = MemoryReporter::new();
        for query in &queries {
            Presenter::new(&reporter).results(query, &SearchOutcome::NotFound);
        }

        let mut warnings = reporter.messages(Level::Warn);
        assert_eq!(warnings.len(), 4);
        warnings.dedup();
        assert_eq!(warnings.len(), 4);
        assert!(reporter.messages(Level::Failure).is_empty());
    }

    #[test]
    fn test_difficulty_search_prints_legend() {
        let reporter = MemoryReporter::new();
        Presenter::new(&reporter).searching(&Query::Difficulty("Insane".into()));

        assert!(reporter.contains("Difficulty levels:"));
        assert_eq!(reporter.messages(Level::Failure), vec!["- Insane"]);
        assert_eq!(reporter.messages(Level::Warn), vec!["- Difícil"]);
        assert!(reporter.contains("Searching machines with difficulty 'Insane'"));
    }

    #[test]
    fn test_quiet_presenter_keeps_results() {
        let reporter = MemoryReporter::new();
        let presenter = Presenter::new(&reporter).quiet(true);
        let query = Query::Skill("smb".into());

        presenter.searching(&query);
        presenter.update_started(true);
        presenter.results(&query, &SearchOutcome::Records(vec![blue()]));
        presenter.results(&query, &SearchOutcome::NotFound);

        assert!(!reporter.contains("Searching"));
        assert!(!reporter.contains("Checking for updates"));
        assert!(reporter.contains("Name: Blue"));
        assert_eq!(reporter.messages(Level::Warn).len(), 1);
    }

    #[test]
    fn test_update_messages() {
        let reporter = MemoryReporter::new();
        let presenter = Presenter::new(&reporter);
        let hash = crate::app::Md5Hash::compute("x");

        presenter.update_started(false);
        presenter.update_finished(&UpdateOutcome::Unchanged { hash });

        assert!(reporter.contains("first time"));
        assert_eq!(reporter.messages(Level::Success), vec!["No updates available"]);
    }
}
