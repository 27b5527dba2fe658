//! Error types for loading and querying a symbol index table.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or reading a [`Table`](crate::table::Table).
#[derive(Error, Debug)]
pub enum IndexError {
    /// A record is structurally invalid (missing key or label, no targets).
    #[error("malformed entry at position {position}: {reason}")]
    MalformedData { position: usize, reason: String },

    /// `resolve` was asked for a target the entry does not have.
    #[error("target index {index} out of range for entry with {len} target(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Doxygen search data could not be tokenized or parsed.
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// JSON record source did not deserialize.
    #[error("invalid JSON records: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a search data file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A search data directory contained no files for the category.
    #[error("no `{category}_<n>.js` files found in {}", dir.display())]
    NoSources { dir: PathBuf, category: String },

    /// Building the prefix index failed.
    #[error("prefix index error: {0}")]
    Fst(#[from] fst::Error),
}

impl IndexError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        IndexError::MalformedData {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        IndexError::Syntax {
            offset,
            message: message.into(),
        }
    }
}

/// Result type alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
