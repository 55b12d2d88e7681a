use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::Priority;

/// How listeners with equal priority are ordered relative to each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Lexicographic by listener name, "a" before "b"
    #[default]
    NameAscending,
    /// Reverse lexicographic by listener name
    NameDescending,
    /// The listener registered first runs first
    Registration,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::NameAscending => write!(f, "name_ascending"),
            TieBreak::NameDescending => write!(f, "name_descending"),
            TieBreak::Registration => write!(f, "registration"),
        }
    }
}

/// One row of a per-event priority table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityEntry {
    pub priority: Priority,
    /// Registration sequence number of the owning listener
    pub sequence: u64,
}

/// Orders listener names by descending priority.
///
/// Ties never fall back to map iteration order: the configured [`TieBreak`]
/// decides, and every policy is a total order, so the same table always
/// sorts the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrioritySorter {
    tie_break: TieBreak,
}

impl PrioritySorter {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Sort a priority table, highest priority first
    pub fn sort<'a, I>(&self, table: I) -> Vec<String>
    where
        I: IntoIterator<Item = (&'a String, &'a PriorityEntry)>,
    {
        let mut rows: Vec<(&String, &PriorityEntry)> = table.into_iter().collect();
        rows.sort_by(|a, b| {
            b.1.priority
                .cmp(&a.1.priority)
                .then_with(|| self.break_tie(a, b))
        });
        rows.into_iter().map(|(name, _)| name.clone()).collect()
    }

    fn break_tie(&self, a: &(&String, &PriorityEntry), b: &(&String, &PriorityEntry)) -> Ordering {
        match self.tie_break {
            TieBreak::NameAscending => a.0.cmp(b.0),
            TieBreak::NameDescending => b.0.cmp(a.0),
            // Sequences are unique per listener; the name only matters for hand-built tables
            TieBreak::Registration => a.1.sequence.cmp(&b.1.sequence).then_with(|| a.0.cmp(b.0)),
        }
    }
}
