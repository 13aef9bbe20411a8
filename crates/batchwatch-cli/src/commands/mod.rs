use super::*;

pub mod clean;
pub mod init;
pub mod status;

pub use clean::clean;
pub use init::{init, InitOptions};
pub use status::{status, StatusOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
  /// Sync with the store and show every account (default when no command is given)
  Status(StatusOptions),

  /// Write a configuration file
  Init(InitOptions),

  /// Delete the saved snapshot after confirmation
  Clean,
}
