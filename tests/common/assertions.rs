#![allow(dead_code)]
//! Domain-specific assertion macros for doxsift harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* table invariant was violated.

use doxsift_core::{IndexEntry, Table};

/// Assert that a result set has exactly these keys, in this order.
///
/// ```rust
/// assert_keys!(table.search("wav64"), ["wav64_open", "wav64_play"]);
/// ```
#[macro_export]
macro_rules! assert_keys {
    ($results:expr, [$($key:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $results.into_iter().map(|e| e.key.as_str()).collect();
        let expected: Vec<&str> = vec![$($key),*];
        pretty_assertions::assert_eq!(actual, expected, "result keys differ");
    }};
}

/// Assert that every entry in a result set satisfies a predicate.
///
/// ```rust
/// assert_results_all!(results, |e| e.key.contains("wav"));
/// ```
#[macro_export]
macro_rules! assert_results_all {
    ($results:expr, $pred:expr) => {{
        let results: &[&doxsift_core::IndexEntry] = &$results;
        let pred = $pred;
        let failing: Vec<_> = results.iter().filter(|e| !pred(**e)).map(|e| &e.key).collect();
        if !failing.is_empty() {
            panic!(
                "assert_results_all! failed: {} of {} entries did not satisfy predicate: {:?}",
                failing.len(),
                results.len(),
                failing
            );
        }
    }};
}

/// Every entry of the table has at least one target.
pub fn assert_targets_non_empty(table: &Table) {
    for (i, entry) in table.iter().enumerate() {
        assert!(
            !entry.targets.is_empty(),
            "entry {i} ({:?}) has no targets",
            entry.key
        );
    }
}

/// Render entries as `label | origin | link` lines, one per target, for
/// snapshot comparison.
pub fn render(entries: &[&IndexEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        for target in &entry.targets {
            out.push_str(&format!(
                "{} | {} | {}\n",
                entry.label, target.origin_label, target.link
            ));
        }
    }
    out
}
