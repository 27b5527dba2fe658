#![allow(dead_code)]
//! Static search data used across harnesses.
//!
//! `tests/fixtures/search/` mirrors the layout of a Doxygen `html/search`
//! directory: `all_0.js` and `all_17.js` for the `all` category, plus a
//! `functions_0.js` table and a `broken_0.js` table with one row that has no
//! targets.

use std::path::PathBuf;

/// The `w` bucket of a console SDK reference (audio, display, filesystem,
/// controller and register symbols).
pub const ALL_17_JS: &str = include_str!("../fixtures/search/all_17.js");

/// Number of rows in [`ALL_17_JS`].
pub const ALL_17_ROWS: usize = 31;

/// Number of rows in `all_0.js`.
pub const ALL_0_ROWS: usize = 5;

/// Rows whose key contains `wav64`, in file order.
pub const WAV64_KEYS: &[&str] = &[
    "wav64.c",
    "wav64.h",
    "wav64_header_t",
    "wav64_open",
    "wav64_play",
    "wav64_set_loop",
    "wav64_t",
];

/// A small JSON record document with one entry per SDK area.
pub const RECORDS_JSON: &str = r#"[
  {"key": "mixer_init", "label": "mixer_init",
   "targets": [{"link": "../mixer_8h.html#a1", "origin_label": "mixer.c"}]},
  {"key": "display_init", "label": "display_init",
   "targets": [{"link": "../group__display.html#ga1", "origin_label": "display.c"},
               {"link": "../display_8h.html#ga1", "origin_label": "display.c"}]},
  {"key": "dfs_open", "label": "dfs_open",
   "targets": [{"link": "../group__dfs.html#ga2", "origin_label": "dragonfs.c"}]},
  {"key": "controller_scan", "label": "controller_scan",
   "targets": [{"link": "../group__controller.html#ga3", "origin_label": "controller.c"}]},
  {"key": "vi_regs_t", "label": "VI_regs_t",
   "targets": [{"link": "../structVI__regs__t.html"}]}
]"#;

/// Path of the fixture search data directory.
pub fn search_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("search")
}
