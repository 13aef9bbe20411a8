//! Account batch tracking with remote sync and offline fallback.
//!
//! `batchwatch` keeps a viewer informed about which time-boxed batch is live on each of a set of
//! named accounts, and how long that batch has left. It provides:
//!
//! - A [`source::Coordinator`] that fetches the freshest snapshot from a remote JSON document
//!   store and falls back to the last snapshot persisted on disk when the network is unavailable
//! - A pure [`resolver::resolve`] function that turns a snapshot into one presentation-ready
//!   [`resolver::StatusRecord`] per account
//! - TOML backed [`config::Config`] for the endpoint, timeout, and cache location
//!
//! # Getting Started
//!
//! ```no_run
//! use batchwatch::{
//!   config::Config,
//!   resolver,
//!   source::{Acquisition, Coordinator},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load_or_default(None)?;
//!   let coordinator = Coordinator::from_config(&config)?;
//!
//!   match coordinator.acquire().await {
//!     Acquisition::Available { snapshot, provenance } => {
//!       let now = chrono::Local::now().naive_local();
//!       for status in resolver::resolve(&snapshot, now) {
//!         println!("[{provenance}] {}: {}", status.account_name, status.time_message);
//!       }
//!     },
//!     Acquisition::Unavailable => println!("No internet & No saved file."),
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`snapshot`]: The raw account and batch documents exchanged with the store
//! - [`timestamp`]: Strict parsing of batch end times
//! - [`resolver`]: Batch selection and urgency classification
//! - [`source`]: Remote fetch, local cache, and the coordinator between them
//! - [`config`]: Configuration loading and defaults
//! - [`error`]: Error type and `Result` alias

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::BTreeMap,
  fmt::Display,
  path::{Path, PathBuf},
  time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod config;
pub mod error;
pub mod resolver;
pub mod snapshot;
pub mod source;
pub mod timestamp;

use crate::error::*;

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use batchwatch::prelude::*;
///
/// async fn example(coordinator: &Coordinator<impl RemoteSource, impl LocalCache>) {
///   if let Acquisition::Available { snapshot, provenance } = coordinator.acquire().await {
///     println!("{} accounts from {provenance}", snapshot.len());
///   }
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::BatchwatchError,
    resolver::{resolve, StatusRecord, UrgencyTier},
    snapshot::RawSnapshot,
    source::{Acquisition, Coordinator, LocalCache, Provenance, RemoteSource},
  };
}
