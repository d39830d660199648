//! xtform CLI - tooling for `.xtform` form documents.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod watcher;

#[derive(Parser)]
#[command(name = "xtform")]
#[command(about = "Parse, check, and edit .xtform form documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to xtform.toml config file
    #[arg(short, long, default_value = "xtform.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed document tree and diagnostics
    Parse {
        /// Document to parse
        file: PathBuf,

        /// Print the whole parse result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report diagnostics for documents (defaults to configured directories)
    Check {
        /// Files or directories to check
        paths: Vec<PathBuf>,
    },

    /// Rewrite a document in canonical form
    Fmt {
        /// Document to format
        file: PathBuf,

        /// Fail instead of writing when the file is not formatted
        #[arg(long)]
        check: bool,
    },

    /// Set a form field value in the data section
    Set {
        /// Document to update
        file: PathBuf,

        /// Field name
        field: String,

        /// New value, read as JSON when it parses (e.g. 42, true, null), else as text
        value: String,
    },

    /// Insert a component template from the registry
    Insert {
        /// Document to update
        file: PathBuf,

        /// Component id from the registry
        component: String,
    },

    /// Print the document body as plain text
    Body {
        /// Document to read
        file: PathBuf,
    },

    /// List the component palette
    Palette {
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-check documents whenever they change
    Watch {
        /// Directory to watch (defaults to the first configured check directory)
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Parse { file, json } => {
            commands::parse::run(&file, json).await?;
        }
        Commands::Check { paths } => {
            let paths = if paths.is_empty() {
                config.check.dirs
            } else {
                paths
            };
            commands::check::run(paths).await?;
        }
        Commands::Fmt { file, check } => {
            commands::fmt::run(&file, check).await?;
        }
        Commands::Set { file, field, value } => {
            commands::set::run(&file, &field, value).await?;
        }
        Commands::Insert { file, component } => {
            commands::insert::run(&file, &component, &config.registry.root).await?;
        }
        Commands::Body { file } => {
            commands::body::run(&file).await?;
        }
        Commands::Palette { json } => {
            commands::palette::run(&config.registry.root, json)?;
        }
        Commands::Watch { dir } => {
            let dir = dir
                .or_else(|| config.check.dirs.into_iter().next())
                .unwrap_or_else(|| PathBuf::from("."));
            commands::watch::run(dir, config.watch.debounce_ms).await?;
        }
    }

    Ok(())
}
