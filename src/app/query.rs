//! Query predicates over the cached bundle
//!
//! Every search is a single pass over the text. Results keep the order in
//! which machines appear in the bundle.

use std::fmt;

use tracing::debug;

use crate::app::extract::{find_machine_block, records};
use crate::app::models::MachineRecord;

/// What the user is looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Exact machine name, matched at the line level
    Name(String),
    /// Exact difficulty label, case-insensitive
    Difficulty(String),
    /// Exact operating system label, case-insensitive
    OperatingSystem(String),
    /// Skill or technique substring, case-insensitive
    Skill(String),
}

impl Query {
    /// The raw search term
    pub fn term(&self) -> &str {
        match self {
            Query::Name(term)
            | Query::Difficulty(term)
            | Query::OperatingSystem(term)
            | Query::Skill(term) => term,
        }
    }

    /// Whether `record` satisfies this query
    pub fn matches(&self, record: &MachineRecord) -> bool {
        match self {
            Query::Name(target) => record.name.as_deref() == Some(target.as_str()),
            Query::Difficulty(target) => eq_ignore_case(record.difficulty.as_deref(), target),
            Query::OperatingSystem(target) => {
                eq_ignore_case(record.operating_system.as_deref(), target)
            }
            Query::Skill(target) => match record.skills.as_deref() {
                Some(skills) if !skills.trim().is_empty() => {
                    skills.to_lowercase().contains(&target.to_lowercase())
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Name(term) => write!(f, "name '{}'", term),
            Query::Difficulty(term) => write!(f, "difficulty '{}'", term),
            Query::OperatingSystem(term) => write!(f, "operating system '{}'", term),
            Query::Skill(term) => write!(f, "technique '{}'", term),
        }
    }
}

fn eq_ignore_case(value: Option<&str>, target: &str) -> bool {
    value.is_some_and(|value| value.to_lowercase() == target.to_lowercase())
}

/// Result of running a [`Query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Cleaned lines of the block describing the named machine
    Block(Vec<String>),
    /// Records matching a field query, in bundle order
    Records(Vec<MachineRecord>),
    /// The query ran and matched nothing
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        !matches!(self, SearchOutcome::NotFound)
    }
}

/// Run `query` over the bundle text
pub fn search(text: &str, query: &Query) -> SearchOutcome {
    let outcome = match query {
        Query::Name(name) => find_machine_block(text, name)
            .map(SearchOutcome::Block)
            .unwrap_or(SearchOutcome::NotFound),
        _ => {
            let matched: Vec<_> = records(text).filter(|r| query.matches(r)).collect();
            if matched.is_empty() {
                SearchOutcome::NotFound
            } else {
                SearchOutcome::Records(matched)
            }
        }
    };

    debug!("Search for {} found results: {}", query, outcome.is_found());
    outcome
}
