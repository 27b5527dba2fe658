//! Core types for doxsift-core.
//!
//! This module defines the data model shared by every layer: the
//! [`IndexEntry`] rows of a symbol index table and the [`Target`] locations
//! each row points at.

use serde::Serialize;

/// One row of the symbol index: a search key mapped to one or more
/// navigable symbol locations.
///
/// Entries are only built by [`Table::load`](crate::table::Table::load),
/// which guarantees `targets` is never empty. They are never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// Searchable token, e.g. `wav64_open`. Not unique across entries.
    pub key: String,
    /// Human-readable symbol name shown to the user, e.g. `WAV_RIFF_ID`.
    pub label: String,
    /// Destinations in definition order.
    pub targets: Vec<Target>,
}

impl IndexEntry {
    /// Number of destinations this entry carries (always at least one).
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

/// A single navigable destination associated with an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    /// Page plus optional `#anchor`, relative to the search data directory
    /// (e.g. `../wav64_8c.html#ad66af3ff9f0c1d51211cc72c1b92a6e9`).
    pub link: String,
    /// Where the symbol is declared or defined (`wav64.c`, `mixer.h`,
    /// `wav64_t::wave()`). Empty for file and struct pages.
    pub origin_label: String,
}

impl Target {
    pub fn new(link: impl Into<String>, origin_label: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            origin_label: origin_label.into(),
        }
    }

    /// The page part of the link, without the anchor.
    pub fn page(&self) -> &str {
        match self.link.split_once('#') {
            Some((page, _)) => page,
            None => &self.link,
        }
    }

    /// The anchor part of the link, if there is one.
    pub fn anchor(&self) -> Option<&str> {
        self.link.split_once('#').map(|(_, anchor)| anchor)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.origin_label.is_empty() {
            write!(f, "{}", self.link)
        } else {
            write!(f, "{} ({})", self.link, self.origin_label)
        }
    }
}
