#![allow(dead_code)]
//! Test builders — ergonomic constructors for records and tables.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use doxsift_core::{RawEntry, Source, Table};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawEntry`] fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("wav64_open")
///     .label("wav64_open")
///     .target("../wav64_8h.html#ad66a", "wav64.c")
///     .build();
/// ```
pub struct RecordBuilder {
    key: Option<String>,
    label: Option<String>,
    targets: Vec<(String, String)>,
}

impl RecordBuilder {
    /// Starts with `label == key` and no targets.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: Some(key.clone()),
            key: Some(key),
            targets: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn without_key(mut self) -> Self {
        self.key = None;
        self
    }

    pub fn without_label(mut self) -> Self {
        self.label = None;
        self
    }

    pub fn target(mut self, link: impl Into<String>, origin: impl Into<String>) -> Self {
        self.targets.push((link.into(), origin.into()));
        self
    }

    pub fn build(self) -> RawEntry {
        let base = RawEntry {
            key: self.key,
            label: self.label,
            ..RawEntry::default()
        };
        self.targets
            .into_iter()
            .fold(base, |record, (link, origin)| record.target(link, origin))
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A record with a single target whose link is derived from the key.
pub fn symbol(key: &str, origin: &str) -> RawEntry {
    RecordBuilder::new(key)
        .target(format!("../{origin}.html#{key}"), origin)
        .build()
}

/// Load a table from in-memory records, panicking on failure.
pub fn table_of(records: Vec<RawEntry>) -> Table {
    Table::load(Source::Records(records)).expect("test records must load")
}

/// Build `n` well-formed records with keys `sym_0000` .. and one to three
/// targets each.
pub fn build_corpus(n: usize) -> Vec<RawEntry> {
    (0..n)
        .map(|i| {
            let mut record = RecordBuilder::new(format!("sym_{i:04}"));
            for t in 0..(i % 3 + 1) {
                record = record.target(format!("../page_{t}.html#a{i}"), format!("unit_{t}.c"));
            }
            record.build()
        })
        .collect()
}
