//! Binary entry point for chainatlas.
//!
//! This binary provides the CLI interface for building and serving the
//! smart elderly-care industry-chain graph.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr/print_stdout in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow unnecessary_wraps for consistent command function signatures
#![allow(clippy::unnecessary_wraps)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use chainatlas::config::AtlasConfig;
use chainatlas::llm::{QwenClient, Summarizer};
use chainatlas::{ExportService, GraphStore, ImportService, SqliteGraphStore};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

/// Chainatlas - industry-chain graph builder for smart elderly care.
#[derive(Parser)]
#[command(name = "chainatlas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Rebuild the graph from a spreadsheet export.
    Import {
        /// Path to the CSV input file.
        input: PathBuf,

        /// Graph database path (overrides configuration).
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Enable summarization enrichment.
        #[arg(long)]
        enrich: bool,
    },

    /// Serialize the graph as a {nodes, links} JSON document.
    Export {
        /// Graph database path (overrides configuration).
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Maximum node rows to read.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Show graph statistics.
    Status {
        /// Graph database path (overrides configuration).
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // .env is optional; ignore when absent
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Initializes log output on stderr, keeping stdout for document output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> anyhow::Result<AtlasConfig> {
    if let Some(config_path) = path {
        return AtlasConfig::load_from_file(std::path::Path::new(config_path))
            .map_err(std::convert::Into::into);
    }

    if let Ok(config_path) = std::env::var("CHAINATLAS_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return AtlasConfig::load_from_file(std::path::Path::new(&config_path))
                .map_err(std::convert::Into::into);
        }
    }

    Ok(AtlasConfig::load_default())
}

/// Runs the selected command.
fn run_command(cli: Cli, config: AtlasConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Import {
            input,
            store,
            enrich,
        } => cmd_import(&config, input, store, enrich),

        Commands::Export {
            store,
            limit,
            pretty,
        } => cmd_export(&config, store, limit, pretty),

        Commands::Status { store } => cmd_status(&config, store),
    }
}

/// Opens the SQLite store at the configured or overridden path.
fn open_store(
    config: &AtlasConfig,
    store: Option<PathBuf>,
) -> anyhow::Result<SqliteGraphStore> {
    let path = store.unwrap_or_else(|| config.store_path.clone());
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SqliteGraphStore::new(path).map_err(std::convert::Into::into)
}

/// Builds a summarizer from the configuration.
fn build_summarizer(config: &AtlasConfig) -> QwenClient {
    let mut client = QwenClient::new();
    if let Some(ref api_key) = config.summarizer.api_key {
        client = client.with_api_key(api_key);
    }
    if let Some(ref model) = config.summarizer.model {
        client = client.with_model(model);
    }
    if let Some(ref base_url) = config.summarizer.base_url {
        client = client.with_endpoint(base_url);
    }
    client
}

/// Import command.
fn cmd_import(
    config: &AtlasConfig,
    input: PathBuf,
    store: Option<PathBuf>,
    enrich: bool,
) -> anyhow::Result<()> {
    let store = open_store(config, store)?;
    let file = File::open(&input)
        .with_context(|| format!("failed to open input file {}", input.display()))?;

    let summarizer: Option<QwenClient> = if enrich || config.summarizer.enabled {
        Some(build_summarizer(config))
    } else {
        None
    };

    let mut service = ImportService::new(&store);
    if let Some(ref client) = summarizer {
        println!("Summarization enrichment enabled ({})", client.name());
        service = service.with_summarizer(client);
    }

    let stats = service.run(BufReader::new(file))?;

    println!("Import completed:");
    println!("  Rows read: {}", stats.rows_read);
    println!("  Imported:  {}", stats.imported);
    println!("  Skipped:   {}", stats.skipped);
    println!("  Groups:    {}", stats.groups);
    if stats.enrichment_failures > 0 {
        println!("  Enrichment failures: {}", stats.enrichment_failures);
    }

    Ok(())
}

/// Export command.
///
/// Always emits a JSON object on stdout: the `{nodes, links}` document, or
/// `{"error": "..."}` when the store cannot be read.
fn cmd_export(
    config: &AtlasConfig,
    store: Option<PathBuf>,
    limit: Option<usize>,
    pretty: bool,
) -> anyhow::Result<()> {
    let store = open_store(config, store)?;
    let service =
        ExportService::new(&store).with_row_limit(limit.unwrap_or(config.row_limit));

    let json = match service.build_document() {
        Ok(document) => {
            if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                serde_json::to_string(&document)?
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            serde_json::to_string(&serde_json::json!({ "error": e.to_string() }))?
        },
    };

    println!("{json}");
    Ok(())
}

/// Status command.
fn cmd_status(
    config: &AtlasConfig,
    store: Option<PathBuf>,
) -> anyhow::Result<()> {
    let store = open_store(config, store)?;
    let stats = store.stats()?;

    println!("Chainatlas Status");
    println!("=================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Store: {}",
        store
            .db_path()
            .map_or_else(|| "(in memory)".to_string(), |p| p.display().to_string())
    );
    println!();
    println!("Nodes: {}", stats.node_count);
    let mut levels: Vec<_> = stats.nodes_by_level.iter().collect();
    levels.sort();
    for (level, count) in levels {
        println!("  Level {level}: {count}");
    }
    println!("Edges: {}", stats.edge_count);

    Ok(())
}
