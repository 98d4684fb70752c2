//! Line-oriented record extraction from the reformatted bundle
//!
//! The cached bundle is a JavaScript object-literal dump laid out one key per
//! line. Nothing here parses JavaScript: keys are detected by substring, so a
//! token such as `name:` inside an unrelated line (`username:`) is picked up
//! too. That is a known limitation of the format, kept so results match the
//! bundle layout the site publishes.
//!
//! Two extraction modes exist:
//!
//! - [`find_machine_block`] locates the `name: "<target>"` line and returns the
//!   cleaned lines that follow it up to the terminator field.
//! - [`records`] walks every block and yields a [`MachineRecord`] each time a
//!   closing-brace line ends an accumulated block.

use crate::app::models::{FieldTag, MachineRecord};
use crate::constants::fields;

/// Detect the first recognised key on a line and extract its value
///
/// The value is the text after the first occurrence of the key, trimmed of
/// whitespace and then of surrounding `"` and `,`.
pub fn detect_field(line: &str) -> Option<(FieldTag, String)> {
    FieldTag::ALL.into_iter().find_map(|tag| {
        line.split_once(tag.token())
            .map(|(_, rest)| (tag, clean_value(rest)))
    })
}

fn clean_value(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == ',')
        .to_string()
}

/// Extractor state between lines
#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Accumulating(MachineRecord),
}

/// Small state machine turning lines into records
///
/// `Idle → Accumulating` on the first recognised field, and back to `Idle` on a
/// closing line, emitting the finalized record.
#[derive(Debug, Default)]
pub struct RecordScanner {
    state: ScanState,
}

impl RecordScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line; returns a record when this line closes a block
    pub fn feed(&mut self, line: &str) -> Option<MachineRecord> {
        let line = line.trim();

        if let Some((tag, value)) = detect_field(line) {
            match &mut self.state {
                ScanState::Accumulating(record) => record.set(tag, value),
                ScanState::Idle => {
                    let mut record = MachineRecord::default();
                    record.set(tag, value);
                    self.state = ScanState::Accumulating(record);
                }
            }
            return None;
        }

        if line.contains(fields::BLOCK_CLOSE) {
            if let ScanState::Accumulating(record) = std::mem::take(&mut self.state) {
                return Some(record);
            }
        }

        None
    }

    /// Whether a block is currently open
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, ScanState::Accumulating(_))
    }
}

/// Lazy iterator over the records of a bundle
pub struct Records<'a> {
    lines: std::str::Lines<'a>,
    scanner: RecordScanner,
}

impl Iterator for Records<'_> {
    type Item = MachineRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(record) = self.scanner.feed(line) {
                return Some(record);
            }
        }
        None
    }
}

/// Iterate the records of a bundle in first-seen order
///
/// Fields that follow the last closing line are discarded.
pub fn records(text: &str) -> Records<'_> {
    Records {
        lines: text.lines(),
        scanner: RecordScanner::new(),
    }
}

/// Find the block describing machine `name`
///
/// Scanning stops at the first block that matches. Returns `None` when no
/// line holds `name: "<name>"` or when nothing follows it before the
/// terminator field.
pub fn find_machine_block(text: &str, name: &str) -> Option<Vec<String>> {
    let needle = format!("{} \"{}\"", fields::NAME, name);

    let mut lines = text.lines().skip_while(|line| !line.contains(&needle));
    lines.next()?;

    let captured: Vec<&str> = lines
        .take_while(|line| !line.contains(fields::TERMINATOR))
        .collect();
    if captured.is_empty() {
        return None;
    }

    Some(
        captured
            .into_iter()
            .map(clean_block_line)
            .filter(|line| !line.is_empty() && !is_hidden(line))
            .collect(),
    )
}

fn clean_block_line(line: &str) -> String {
    let stripped: String = line
        .trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect();
    stripped.trim_end_matches(',').trim_end().to_string()
}

fn is_hidden(line: &str) -> bool {
    fields::HIDDEN.iter().any(|field| line.contains(field))
}
