//! Error types for the batchwatch library.
//!
//! Most of these never reach a caller of [`Coordinator::acquire`](crate::source::Coordinator),
//! which turns fetch and cache failures into a fallback or an
//! [`Acquisition::Unavailable`](crate::source::Acquisition). They surface directly from the
//! individual sources, from configuration loading, and from [`LocalCache::save`].
//!
//! # Examples
//!
//! ```no_run
//! use batchwatch::{
//!   config::Config,
//!   error::BatchwatchError,
//!   source::{http::HttpSource, RemoteSource},
//! };
//!
//! # async fn example() -> Result<(), BatchwatchError> {
//! let source = HttpSource::new(&Config::default().remote)?;
//! match source.fetch().await {
//!   Err(BatchwatchError::Status(code)) => println!("store answered {code}"),
//!   Err(BatchwatchError::Network(e)) => println!("network error: {e}"),
//!   Err(e) => println!("other error: {e}"),
//!   Ok(None) => println!("store is empty"),
//!   Ok(Some(snapshot)) => println!("{} accounts", snapshot.len()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`LocalCache::save`]: crate::source::LocalCache::save

use std::time::Duration;

use thiserror::Error;

/// Error type alias used for the [`batchwatch`](crate) crate.
pub type Result<T> = core::result::Result<T, BatchwatchError>;

/// Errors that can occur while syncing or loading snapshots.
#[derive(Error, Debug)]
pub enum BatchwatchError {
  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The store is unreachable
  /// - TLS errors occur
  /// - The response body could not be read
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The store answered with something other than `200 OK`.
  #[error("Remote store responded with status {0}")]
  Status(reqwest::StatusCode),

  /// The fetch did not complete within the configured bound.
  #[error("Remote fetch timed out after {0:?}")]
  Timeout(Duration),

  /// A document could not be parsed into, or serialized from, a snapshot.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Reading or writing the cache or configuration file fails
  /// - Creating the parent directory fails
  /// - Permission errors occur
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The temporary cache file could not be moved over the previous one.
  #[error(transparent)]
  Persist(#[from] tempfile::PersistError),

  /// A configuration file was not valid TOML for [`Config`](crate::config::Config).
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be rendered as TOML.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// The configuration is well formed but unusable, e.g. an invalid store URL.
  #[error("{0}")]
  Config(String),
}
