//! CLI command parsing.

use clap::{Parser, Subcommand, ValueEnum};

/// Browse a remote photo feed and curate which photos are shown.
#[derive(Parser)]
#[command(name = "photodeck")]
#[command(about = "Browse a remote photo feed and curate which photos are shown")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the TUI interface.
    Tui,

    /// Print the visible photos (fetched, not disabled, matching the search).
    #[command(visible_alias = "ls")]
    Photos {
        /// Only show photos whose title contains this text (case-insensitive).
        #[arg(short, long)]
        search: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Review and edit the disabled set.
    Disabled {
        #[command(subcommand)]
        command: DisabledCommands,
    },

    /// Start the HTTP API server.
    Serve {
        /// Host to bind to (defaults to config).
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (defaults to config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum DisabledCommands {
    /// List disabled photos.
    List {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Disable a photo by key (`<albumId>-<id>`).
    Add {
        /// Photo key.
        key: String,
    },

    /// Re-enable a photo by key (`<albumId>-<id>`).
    #[command(visible_alias = "rm")]
    Remove {
        /// Photo key.
        key: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration.
    Show,

    /// Show the configuration file path.
    Path,

    /// Generate a new API token for remote access.
    GenerateToken,
}

/// Listing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
