//! Symbol index table — immutable, load-once lookup from partial symbol
//! names to [`IndexEntry`] rows.
//!
//! [`Table::load`] validates every record of a [`Source`] and builds two
//! views over the result: a case-folded key per entry for substring scans,
//! and an FST over the distinct folded keys for prefix lookups. Nothing is
//! mutated after load, so a `&Table` (or `Arc<Table>`) can be shared across
//! threads freely.

use crate::error::{IndexError, IndexResult};
use crate::source::{RawEntry, Source};
use crate::types::{IndexEntry, Target};
use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use serde::Deserialize;
use std::collections::BTreeMap;

/// What [`Table::load`] does with a structurally invalid record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole load on the first malformed record.
    #[default]
    Abort,
    /// Drop the record, log a warning, and count it in [`Table::skipped`].
    Skip,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub on_malformed: MalformedPolicy,
}

pub struct Table {
    entries: Vec<IndexEntry>,
    /// `entries[i].key.to_lowercase()`, kept alongside to avoid refolding
    /// on every query.
    folded: Vec<String>,
    /// Distinct folded key -> slot in `positions`.
    prefix_index: Map<Vec<u8>>,
    /// Entry positions per distinct key, ascending.
    positions: Vec<Vec<usize>>,
    skipped: usize,
}

impl Table {
    /// Load with the default options (abort on malformed records).
    pub fn load(source: Source) -> IndexResult<Self> {
        Self::load_with(source, LoadOptions::default())
    }

    pub fn load_with(source: Source, options: LoadOptions) -> IndexResult<Self> {
        let records = source.into_records()?;
        let total = records.len();

        let mut entries = Vec::with_capacity(total);
        let mut skipped = 0;
        for (position, record) in records.into_iter().enumerate() {
            match validate(position, record) {
                Ok(entry) => entries.push(entry),
                Err(err) => match options.on_malformed {
                    MalformedPolicy::Abort => return Err(err),
                    MalformedPolicy::Skip => {
                        tracing::warn!(%err, "skipping malformed index entry");
                        skipped += 1;
                    }
                },
            }
        }

        let table = Self::from_entries(entries, skipped)?;
        tracing::debug!(
            records = total,
            entries = table.len(),
            skipped,
            "symbol index loaded"
        );
        Ok(table)
    }

    fn from_entries(entries: Vec<IndexEntry>, skipped: usize) -> IndexResult<Self> {
        let folded: Vec<String> = entries.iter().map(|e| e.key.to_lowercase()).collect();

        let mut by_key: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, key) in folded.iter().enumerate() {
            by_key.entry(key.as_str()).or_default().push(i);
        }

        let mut builder = MapBuilder::memory();
        let mut positions = Vec::with_capacity(by_key.len());
        for (slot, (key, at)) in by_key.into_iter().enumerate() {
            builder.insert(key, slot as u64)?;
            positions.push(at);
        }
        let prefix_index = Map::new(builder.into_inner()?)?;

        Ok(Self {
            entries,
            folded,
            prefix_index,
            positions,
            skipped,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records dropped under [`MalformedPolicy::Skip`].
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// All entries in load order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }

    /// Entries whose key contains `query`, ignoring case, in load order.
    ///
    /// The returned iterator is lazy and borrows the table; call `search`
    /// again to restart the scan. An empty query matches every entry.
    pub fn search<'a>(&'a self, query: &str) -> Matches<'a> {
        Matches {
            table: self,
            needle: query.to_lowercase(),
            next: 0,
        }
    }

    /// Entries whose key starts with `query`, ignoring case, in load order.
    pub fn prefix(&self, query: &str) -> Vec<&IndexEntry> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        let mut stream = self
            .prefix_index
            .search(Str::new(&needle).starts_with())
            .into_stream();
        while let Some((_, slot)) = stream.next() {
            hits.extend_from_slice(&self.positions[slot as usize]);
        }
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.entries[i]).collect()
    }

    /// Entries whose key equals `key`, ignoring case, in load order.
    pub fn find_exact(&self, key: &str) -> Vec<&IndexEntry> {
        let needle = key.to_lowercase();
        match self.prefix_index.get(&needle) {
            Some(slot) => self.positions[slot as usize]
                .iter()
                .map(|&i| &self.entries[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// The target at `index` of `entry`.
    pub fn resolve<'e>(&self, entry: &'e IndexEntry, index: usize) -> IndexResult<&'e Target> {
        resolve(entry, index)
    }
}

/// The target at `index` of `entry`; fails with
/// [`IndexError::IndexOutOfRange`] past the end.
pub fn resolve(entry: &IndexEntry, index: usize) -> IndexResult<&Target> {
    entry.targets.get(index).ok_or(IndexError::IndexOutOfRange {
        index,
        len: entry.targets.len(),
    })
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("entries", &self.entries.len())
            .field("distinct_keys", &self.positions.len())
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lazy substring scan returned by [`Table::search`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    table: &'a Table,
    needle: String,
    next: usize,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a IndexEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        while self.next < table.entries.len() {
            let i = self.next;
            self.next += 1;
            if table.folded[i].contains(self.needle.as_str()) {
                return Some(&table.entries[i]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.table.entries.len() - self.next))
    }
}

impl std::iter::FusedIterator for Matches<'_> {}

fn validate(position: usize, record: RawEntry) -> IndexResult<IndexEntry> {
    if let Some(defect) = record.defect {
        return Err(IndexError::malformed(position, defect));
    }
    let key = match record.key {
        Some(key) if !key.is_empty() => key,
        _ => return Err(IndexError::malformed(position, "missing key")),
    };
    let label = match record.label {
        Some(label) if !label.is_empty() => label,
        _ => return Err(IndexError::malformed(position, format!("entry {key:?} has no label"))),
    };
    if record.targets.is_empty() {
        return Err(IndexError::malformed(
            position,
            format!("entry {key:?} has an empty target list"),
        ));
    }

    let mut targets = Vec::with_capacity(record.targets.len());
    for (n, raw) in record.targets.into_iter().enumerate() {
        match raw.link {
            Some(link) if !link.is_empty() => targets.push(Target {
                link,
                origin_label: raw.origin_label,
            }),
            _ => {
                return Err(IndexError::malformed(
                    position,
                    format!("target {n} of entry {key:?} has no link"),
                ))
            }
        }
    }

    Ok(IndexEntry {
        key,
        label,
        targets,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
