//! doxsift-core — symbol lookup over Doxygen search data.
//!
//! This crate loads the generated search tables of a Doxygen HTML site into
//! an immutable [`Table`] and answers "which symbols match X" queries.
//!
//! # Architecture
//!
//! ```text
//! Source ──► doxygen / JSON parse ──► RawEntry ──► Table::load ──► search / prefix / resolve
//!                                                     │
//!                                   MalformedPolicy ──┘
//! ```
//!
//! Loading is the only phase that does I/O. After it returns, the table is
//! read-only and can be queried from any number of threads.

pub mod config;
pub mod doxygen;
pub mod error;
pub mod escape;
pub mod source;
pub mod table;
pub mod types;

pub use error::{IndexError, IndexResult};
pub use source::{RawEntry, RawTarget, Source};
pub use table::{resolve, LoadOptions, MalformedPolicy, Matches, Table};
pub use types::{IndexEntry, Target};
