//! User-facing message sink
//!
//! Operations never print directly. They receive a [`Reporter`] and emit
//! leveled messages through it, so the console build colours them and tests
//! capture them with [`MemoryReporter`]. Diagnostics go through `tracing`
//! instead.

use std::sync::Mutex;

use crossterm::style::Stylize;

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Failure,
    Warn,
    Indented,
}

/// Capability for emitting user-facing messages
pub trait Reporter: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn failure(&self, message: &str) {
        self.emit(Level::Failure, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn indented(&self, message: &str) {
        self.emit(Level::Indented, message);
    }
}

/// Coloured terminal output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{} {}", "[*]".blue().bold(), message),
            Level::Success => println!("{} {}", "[+]".green().bold(), message),
            Level::Warn => println!("{} {}", "[!]".yellow().bold(), message),
            Level::Indented => println!("    {}", message),
            Level::Failure => eprintln!("{} {}", "[-]".red().bold(), message),
        }
    }
}

/// Captures messages in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages emitted at `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// Whether any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}
