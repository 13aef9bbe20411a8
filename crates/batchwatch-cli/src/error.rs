//! Error types for the batchwatch CLI.

use thiserror::Error;

use super::*;

/// Error type alias used for the CLI.
pub type Result<T> = core::result::Result<T, BatchwatchCliError>;

/// Errors that can end a CLI invocation.
#[derive(Error, Debug)]
pub enum BatchwatchCliError {
  /// An error from the [`batchwatch`] library, e.g. an unreadable config file.
  #[error(transparent)]
  Batchwatch(#[from] BatchwatchError),

  /// Reading or writing the terminal or a file failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// An interactive prompt failed.
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Status records could not be rendered as JSON.
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
