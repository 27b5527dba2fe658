//! Sources of index records.
//!
//! A [`Source`] names where the rows of a symbol table come from. Calling
//! [`Source::into_records`] reads and parses it into [`RawEntry`] values,
//! which are deliberately permissive (every field optional) so that
//! structural validation happens in one place, [`Table::load`].
//!
//! [`Table::load`]: crate::table::Table::load

use crate::doxygen;
use crate::error::{IndexError, IndexResult};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where a table's records come from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Records already in memory.
    Records(Vec<RawEntry>),
    /// A JSON array of records.
    Json(String),
    /// The text of one Doxygen search data file.
    DoxygenJs(String),
    /// A single Doxygen search data file on disk.
    DoxygenFile(PathBuf),
    /// Every `<category>_<n>.js` file in a Doxygen `search/` directory,
    /// concatenated in ascending `n`.
    DoxygenDir { dir: PathBuf, category: String },
}

/// An unvalidated record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub targets: Vec<RawTarget>,
    /// Set by a parser that could not make sense of the row at all.
    #[serde(skip)]
    pub defect: Option<String>,
}

/// An unvalidated target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTarget {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub origin_label: String,
}

impl RawEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn target(mut self, link: impl Into<String>, origin_label: impl Into<String>) -> Self {
        self.targets.push(RawTarget {
            link: Some(link.into()),
            origin_label: origin_label.into(),
        });
        self
    }

    pub(crate) fn defective(reason: impl Into<String>) -> Self {
        Self {
            defect: Some(reason.into()),
            ..Self::default()
        }
    }
}

impl Source {
    /// Convenience constructor for a Doxygen `search/` directory.
    pub fn doxygen_dir(dir: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        Source::DoxygenDir {
            dir: dir.into(),
            category: category.into(),
        }
    }

    /// Read and parse the source into raw records, in source order.
    pub fn into_records(self) -> IndexResult<Vec<RawEntry>> {
        match self {
            Source::Records(records) => Ok(records),
            Source::Json(text) => Ok(serde_json::from_str(&text)?),
            Source::DoxygenJs(text) => doxygen::parse(&text),
            Source::DoxygenFile(path) => doxygen::parse(&read(&path)?),
            Source::DoxygenDir { dir, category } => {
                let files = search_data_files(&dir, &category)?;
                let mut records = Vec::new();
                for path in files {
                    let rows = doxygen::parse(&read(&path)?)?;
                    tracing::debug!(path = %path.display(), rows = rows.len(), "parsed search data file");
                    records.extend(rows);
                }
                Ok(records)
            }
        }
    }
}

fn read(path: &Path) -> IndexResult<String> {
    std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// List `<category>_<n>.js` files in `dir`, ordered by `n` numerically so
/// `all_2.js` comes before `all_10.js`.
pub fn search_data_files(dir: &Path, category: &str) -> IndexResult<Vec<PathBuf>> {
    let pattern = Regex::new(&format!(r"^{}_(\d+)\.js$", regex::escape(category)))
        .map_err(|e| IndexError::syntax(0, format!("bad category {category:?}: {e}")))?;

    let io_err = |source| IndexError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut numbered = Vec::new();
    for dirent in std::fs::read_dir(dir).map_err(io_err)? {
        let dirent = dirent.map_err(io_err)?;
        let name = dirent.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(serial) = pattern
            .captures(name)
            .and_then(|caps| caps[1].parse::<u64>().ok())
        else {
            continue;
        };
        numbered.push((serial, dirent.path()));
    }

    if numbered.is_empty() {
        return Err(IndexError::NoSources {
            dir: dir.to_path_buf(),
            category: category.to_string(),
        });
    }
    numbered.sort_by_key(|(serial, _)| *serial);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}
