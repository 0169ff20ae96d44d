use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Collect quotes and keep them in sync with a remote feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional data directory holding the quote state file
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Optional path to the sync config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text
        text: Vec<String>,
        /// Quote category
        #[arg(short, long)]
        category: String,
    },
    /// List quotes
    List {
        /// Only show this category ("all" for everything)
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a random quote
    Random {
        /// Pick from this category instead of the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories
    Categories,
    /// Save the category filter used by `list` and `random`
    Filter {
        /// Category name, or "all"
        category: String,
    },
    /// Export quotes as JSON
    Export {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file ("-" reads stdin)
    Import {
        /// File to import
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Run one sync cycle against the remote feed
    Sync {
        /// Defer conflicts with unsynced local edits to manual review
        #[arg(long)]
        manual: bool,
        /// Skip the network: nothing is fetched and local quotes stay pending upload
        #[arg(long)]
        offline: bool,
    },
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between cycles (defaults to the configured interval)
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
        /// Defer conflicts with unsynced local edits to manual review
        #[arg(long)]
        manual: bool,
    },
    /// Manage sync configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
        /// Optional output file (stdout when omitted)
        #[arg(short, long, value_name = "PATH", conflicts_with = "dir")]
        output: Option<PathBuf>,
        /// Install into a completions directory under the shell's file name
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update the config file
    Init {
        /// Remote collection endpoint
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Category for remote quotes without one
        #[arg(long, value_name = "NAME")]
        default_category: Option<String>,
        /// Seconds between periodic sync cycles
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Maximum remote quotes taken per fetch
        #[arg(long, value_name = "COUNT")]
        fetch_limit: Option<usize>,
        /// Enable or disable manual conflict review
        #[arg(long, value_name = "BOOL")]
        manual_conflicts: Option<bool>,
    },
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
