use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use doxsift_core::config::{Config, SearchMode};
use doxsift_core::{IndexEntry, Source, Table};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doxsift", about = "Symbol lookup over Doxygen search data")]
struct Cli {
    /// Write debug logs to /tmp/doxsift-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    /// Use this config file instead of ~/.config/doxsift/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find entries whose key contains (or starts with) QUERY.
    Search {
        query: String,
        #[command(flatten)]
        index: IndexArgs,
        /// Match keys by prefix instead of substring.
        #[arg(long)]
        prefix: bool,
        /// Maximum entries to print (0 = unlimited).
        #[arg(long)]
        limit: Option<usize>,
        /// Print matching entries as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the link of one target of the entry whose key is KEY.
    Resolve {
        key: String,
        #[command(flatten)]
        index: IndexArgs,
        /// Zero-based target position.
        #[arg(long, default_value_t = 0)]
        target: usize,
    },
    /// Print entry and target counts.
    Stats {
        #[command(flatten)]
        index: IndexArgs,
    },
}

#[derive(Args)]
struct IndexArgs {
    /// Doxygen search data directory, or a single `.js` / `.json` file.
    #[arg(long)]
    index: Option<PathBuf>,
    /// Search data family to load from a directory (all, functions, ...).
    #[arg(long)]
    category: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/doxsift-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("doxsift debug log started — tail -f /tmp/doxsift-debug.log");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "user config unusable, falling back to defaults");
            eprintln!("doxsift: ignoring config ({err:#}), using defaults");
            Config::defaults()
        }),
    };

    match cli.command {
        Command::Search {
            query,
            index,
            prefix,
            limit,
            json,
        } => {
            let table = load_table(&config, &index)?;
            let by_prefix = prefix || config.search.mode == SearchMode::Prefix;
            let limit = match limit.unwrap_or(config.search.limit) {
                0 => usize::MAX,
                n => n,
            };
            let hits: Vec<&IndexEntry> = if by_prefix {
                table.prefix(&query).into_iter().take(limit).collect()
            } else {
                table.search(&query).take(limit).collect()
            };
            tracing::debug!(%query, by_prefix, hits = hits.len(), "search");

            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                for entry in hits {
                    for target in &entry.targets {
                        println!("{}\t{}\t{}", entry.label, target.origin_label, target.link);
                    }
                }
            }
        }
        Command::Resolve { key, index, target } => {
            let table = load_table(&config, &index)?;
            let entry = table
                .find_exact(&key)
                .into_iter()
                .next()
                .with_context(|| format!("no entry with key {key:?}"))?;
            let target = table.resolve(entry, target)?;
            println!("{}", target.link);
        }
        Command::Stats { index } => {
            let table = load_table(&config, &index)?;
            let targets: usize = table.iter().map(IndexEntry::target_count).sum();
            println!("entries\t{}", table.len());
            println!("targets\t{targets}");
            println!("skipped\t{}", table.skipped());
        }
    }

    Ok(())
}

fn load_table(config: &Config, args: &IndexArgs) -> anyhow::Result<Table> {
    let path = args.index.clone().unwrap_or_else(|| config.index.dir.clone());
    let category = args
        .category
        .clone()
        .unwrap_or_else(|| config.index.category.clone());

    let source = if path.is_dir() {
        Source::doxygen_dir(path.clone(), category)
    } else if path.extension().is_some_and(|ext| ext == "json") {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Source::Json(text)
    } else {
        Source::DoxygenFile(path.clone())
    };

    Table::load_with(source, config.index.load_options())
        .with_context(|| format!("loading symbol index from {}", path.display()))
}
