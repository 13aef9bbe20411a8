//! Command line shell for the batchwatch account monitor.
//!
//! The binary asks the [`batchwatch`] engine for the freshest snapshot it can get (live store
//! first, last saved copy second) and prints one card per account showing which batch is live
//! and how long it has left.
//!
//! # Usage
//!
//! ```bash
//! # Point the shell at a store and write the config file
//! batchwatch init --base-url https://my-project-default-rtdb.firebaseio.com
//!
//! # Sync and show every account (also the default with no subcommand)
//! batchwatch status
//!
//! # Show the last saved snapshot without touching the network
//! batchwatch status --offline
//!
//! # Delete the saved snapshot
//! batchwatch clean
//! ```
//!
//! Logging verbosity is raised with `-v` (repeatable) or set through `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use batchwatch::{config::Config, error::BatchwatchError, prelude::*};
use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use tracing::{debug, trace, warn};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Shows which batch is live on each account and how long it has left")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default platform-specific
  /// config directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Option<Commands>,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file this invocation reads and writes.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Loads the configuration named by `--config`, or the default one if present.
  fn load_config(&self) -> Result<Config> {
    Ok(Config::load_or_default(self.config.as_deref())?)
  }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .with_writer(std::io::stderr)
    .init();
}

/// Entry point for the batchwatch CLI application
///
/// Parses arguments, sets up logging, and runs the requested command, defaulting to
/// [`Commands::Status`].
///
/// # Errors
///
/// Returns [`BatchwatchCliError`] when the configuration cannot be read or written, the cache
/// cannot be removed, or an interactive prompt fails. Network and cache failures during a sync
/// are never errors; they end in an offline or "no data" report instead.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let command = cli.command.clone().unwrap_or_else(|| Commands::Status(StatusOptions::default()));
  trace!("Running {command:?}");

  let result = run(&cli, command).await;
  if let Err(e) = &result {
    cli.reply(ResponseContent::Error(e))?;
  }
  result
}

/// Dispatches a parsed command.
async fn run(cli: &Cli, command: Commands) -> Result<()> {
  match command {
    Commands::Status(status_options) => status(cli, &cli.load_config()?, status_options).await,
    Commands::Init(init_options) => init(cli, cli.config_path(), init_options),
    Commands::Clean => clean(cli, &cli.load_config()?),
  }
}
