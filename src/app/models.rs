//! Data model for machines listed in the bundle
//!
//! Records are transient: they are rebuilt on every query from the cached
//! text and dropped once filtered.

use std::fmt;

use crate::constants::fields;

/// Field tags the extractor recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    Name,
    Ip,
    OperatingSystem,
    Skills,
    Difficulty,
}

impl FieldTag {
    /// Detection order; the first tag found on a line claims it
    pub const ALL: [FieldTag; 5] = [
        FieldTag::Name,
        FieldTag::Ip,
        FieldTag::OperatingSystem,
        FieldTag::Skills,
        FieldTag::Difficulty,
    ];

    /// Key token as it appears in the bundle
    pub fn token(self) -> &'static str {
        match self {
            FieldTag::Name => fields::NAME,
            FieldTag::Ip => fields::IP,
            FieldTag::OperatingSystem => fields::OPERATING_SYSTEM,
            FieldTag::Skills => fields::SKILLS,
            FieldTag::Difficulty => fields::DIFFICULTY,
        }
    }
}

/// One machine, as reconstructed from a record block
///
/// Every field is optional because the bundle is only loosely structured;
/// a record exists as soon as any one field was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineRecord {
    pub name: Option<String>,
    pub ip: Option<String>,
    pub operating_system: Option<String>,
    pub skills: Option<String>,
    pub difficulty: Option<String>,
}

impl MachineRecord {
    /// Store a field value, replacing any earlier one
    pub fn set(&mut self, tag: FieldTag, value: String) {
        let slot = match tag {
            FieldTag::Name => &mut self.name,
            FieldTag::Ip => &mut self.ip,
            FieldTag::OperatingSystem => &mut self.operating_system,
            FieldTag::Skills => &mut self.skills,
            FieldTag::Difficulty => &mut self.difficulty,
        };
        *slot = Some(value);
    }

    /// Read a field value
    pub fn get(&self, tag: FieldTag) -> Option<&str> {
        match tag {
            FieldTag::Name => self.name.as_deref(),
            FieldTag::Ip => self.ip.as_deref(),
            FieldTag::OperatingSystem => self.operating_system.as_deref(),
            FieldTag::Skills => self.skills.as_deref(),
            FieldTag::Difficulty => self.difficulty.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        FieldTag::ALL.iter().all(|tag| self.get(*tag).is_none())
    }

    /// Difficulty tier, if the label is one of the known ones
    pub fn tier(&self) -> Option<DifficultyTier> {
        self.difficulty.as_deref().and_then(DifficultyTier::from_label)
    }
}

/// Difficulty labels used by the bundle, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
    Insane,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Insane,
        DifficultyTier::Hard,
        DifficultyTier::Medium,
        DifficultyTier::Easy,
    ];

    /// Label exactly as written in the bundle
    pub fn label(self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Fácil",
            DifficultyTier::Medium => "Media",
            DifficultyTier::Hard => "Difícil",
            DifficultyTier::Insane => "Insane",
        }
    }

    /// Case-insensitive lookup by bundle label
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
