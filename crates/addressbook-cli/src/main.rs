//! Address Book CLI
//!
//! Command-line and terminal interface for the address book.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use addressbook_core::{Config, ContactId};

mod commands;
mod output;
mod tui;

use commands::contact::ContactArgs;
use output::{Output, OutputFormat};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "ADDRESSBOOK_LOG";

#[derive(Parser)]
#[command(name = "addressbook")]
#[command(about = "Address book - contacts in a local SQLite store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Create the database and seed it if empty
    Init,
    /// List contacts
    #[command(alias = "ls")]
    List {
        /// Show at most this many contacts
        #[arg(short, long)]
        limit: Option<usize>,
        /// Skip this many contacts
        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },
    /// Show a contact
    Show {
        /// Contact ID
        id: ContactId,
    },
    /// Create a contact
    #[command(alias = "create")]
    Add {
        #[command(flatten)]
        fields: ContactArgs,
    },
    /// Change fields of a contact
    Edit {
        /// Contact ID
        id: ContactId,
        #[command(flatten)]
        fields: ContactArgs,
    },
    /// Remove a contact
    #[command(alias = "rm")]
    Remove {
        /// Contact ID
        id: ContactId,
    },
    /// Show status (storage location, contact count)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, seed_enabled, seed_url, seed_count,
        /// seed_timeout_secs, page_size, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work without a store
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key.clone(), value.clone(), config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // Handle TUI (default when no command given)
    let command = match cli.command {
        None | Some(Commands::Tui) => return tui::run(config),
        Some(command) => command,
    };

    init_logging();

    match command {
        Commands::Init => commands::init::run(&config, &output),
        Commands::List { limit, offset } => {
            let store = commands::open_store(&config)?;
            commands::contact::list(&store, limit, offset, &output)
        }
        Commands::Show { id } => {
            let store = commands::open_store(&config)?;
            commands::contact::show(&store, id, &output)
        }
        Commands::Add { fields } => {
            let store = commands::open_store(&config)?;
            commands::contact::add(&store, fields, &output)
        }
        Commands::Edit { id, fields } => {
            let store = commands::open_store(&config)?;
            commands::contact::edit(&store, id, fields, &output)
        }
        Commands::Remove { id } => {
            let store = commands::open_store(&config)?;
            commands::contact::remove(&store, id, &output)
        }
        Commands::Status => {
            let store = commands::open_store(&config)?;
            commands::status::show(&store, &config, &output)
        }
        Commands::Tui | Commands::Config { .. } => Ok(()), // Handled above
    }
}

/// Initialize logging for command mode
///
/// Logs to stderr, only when ADDRESSBOOK_LOG is set.
fn init_logging() {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter applying a level to the `addressbook` binary and `addressbook_core`
pub fn log_filter(log_level: &str) -> EnvFilter {
    EnvFilter::new(format!("addressbook={}", log_level))
}
