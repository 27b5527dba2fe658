//! Configuration types for doxsift.
//!
//! [`Config::load`] reads `~/.config/doxsift/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] layers
//! an explicit file over the defaults. [`Config::defaults`] returns the
//! defaults without touching the filesystem (useful in tests).

use crate::table::{LoadOptions, MalformedPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[index]
dir          = "html/search"
category     = "all"
on_malformed = "abort"

[search]
limit = 50
mode  = "substring"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/doxsift/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[index]` section: where the Doxygen search data lives and how strictly
/// it is loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

fn default_dir() -> PathBuf { PathBuf::from("html/search") }
fn default_category() -> String { "all".to_string() }

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            category: default_category(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl IndexConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            on_malformed: self.on_malformed,
        }
    }
}

/// How queries are matched against keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Substring,
    Prefix,
}

/// `[search]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Maximum entries printed per query; 0 means unlimited.
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub mode: SearchMode,
}

fn default_limit() -> usize { 50 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            mode: SearchMode::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/doxsift/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Layer `path` over the built-in defaults. A missing file is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("doxsift")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
