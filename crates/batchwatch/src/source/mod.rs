//! Snapshot acquisition with offline fallback.
//!
//! The [`Coordinator`] answers one question: what is the freshest snapshot we can show right
//! now? It asks a [`RemoteSource`] first and falls back to a [`LocalCache`] holding the last
//! snapshot the remote ever returned.
//!
//! # Policy
//!
//! 1. Fetch from the remote, bounded by a timeout
//! 2. A non-empty document is saved to the cache and returned as [`Provenance::Cloud`]. A failed
//!    save is logged and changes nothing else
//! 3. An empty document, or any failure (network, status, timeout, malformed body), falls through
//! 4. The cache is loaded and returned as [`Provenance::OfflineCache`], or
//!    [`Acquisition::Unavailable`] if it is missing or unreadable
//!
//! Only step 2 ever writes, and only once per call. Calls are single-flight: a second
//! [`Coordinator::acquire`] waits for the first to finish.
//!
//! # Examples
//!
//! ```no_run
//! use batchwatch::{
//!   config::Config,
//!   source::{file::FileCache, http::HttpSource, Acquisition, Coordinator},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default().with_base_url("https://example.firebaseio.com");
//! let coordinator = Coordinator::new(HttpSource::new(&config.remote)?, FileCache::new(&config.cache.path))
//!   .with_timeout(config.remote.timeout());
//!
//! if let Acquisition::Available { snapshot, provenance } = coordinator.acquire().await {
//!   println!("{} accounts ({provenance})", snapshot.len());
//! }
//! # Ok(())
//! # }
//! ```

use tokio::sync::Mutex;

use crate::{config::Config, snapshot::RawSnapshot};

use super::*;

pub mod file;
pub mod http;

use self::{file::FileCache, http::HttpSource};

/// Default bound on a single remote fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a snapshot came from. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
  /// Fetched from the remote store during this call
  Cloud,
  /// Read from the local cache
  OfflineCache,
}

impl Display for Provenance {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Cloud => write!(f, "Cloud"),
      Self::OfflineCache => write!(f, "Offline File"),
    }
  }
}

/// Outcome of [`Coordinator::acquire`].
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
  /// A usable snapshot and where it came from
  Available {
    /// The snapshot
    snapshot:   RawSnapshot,
    /// Where it came from
    provenance: Provenance,
  },
  /// Neither the remote nor the cache produced a snapshot
  Unavailable,
}

impl Acquisition {
  /// The snapshot, if one was acquired.
  pub fn snapshot(&self) -> Option<&RawSnapshot> {
    match self {
      Self::Available { snapshot, .. } => Some(snapshot),
      Self::Unavailable => None,
    }
  }

  /// Where the snapshot came from, if one was acquired.
  pub fn provenance(&self) -> Option<Provenance> {
    match self {
      Self::Available { provenance, .. } => Some(*provenance),
      Self::Unavailable => None,
    }
  }
}

/// The live document store.
#[async_trait]
pub trait RemoteSource: Send + Sync {
  /// Fetches the current snapshot.
  ///
  /// Returns `Ok(None)` when the store answered successfully but holds no data.
  async fn fetch(&self) -> Result<Option<RawSnapshot>>;
}

/// Durable slot for the last fetched snapshot.
#[async_trait]
pub trait LocalCache: Send + Sync {
  /// Reads the cached snapshot. `Ok(None)` means nothing has been cached yet.
  async fn load(&self) -> Result<Option<RawSnapshot>>;

  /// Replaces the cached snapshot. Must never leave a partially written document behind.
  async fn save(&self, snapshot: &RawSnapshot) -> Result<()>;
}

/// Reconciles a [`RemoteSource`] with a [`LocalCache`].
pub struct Coordinator<R, C> {
  /// Live store
  remote:  R,
  /// Fallback store, written after every successful fetch
  cache:   C,
  /// Bound on a single fetch
  timeout: Duration,
  /// Serializes [`Coordinator::acquire`] calls
  flight:  Mutex<()>,
}

impl Coordinator<HttpSource, FileCache> {
  /// Builds the HTTP and file backed coordinator described by `config`.
  pub fn from_config(config: &Config) -> Result<Self> {
    Ok(
      Self::new(HttpSource::new(&config.remote)?, FileCache::new(&config.cache.path))
        .with_timeout(config.remote.timeout()),
    )
  }
}

impl<R: RemoteSource, C: LocalCache> Coordinator<R, C> {
  /// Creates a coordinator with the [`DEFAULT_FETCH_TIMEOUT`].
  pub fn new(remote: R, cache: C) -> Self {
    Self { remote, cache, timeout: DEFAULT_FETCH_TIMEOUT, flight: Mutex::new(()) }
  }

  /// Sets the bound on a single fetch.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// The remote source.
  pub fn remote(&self) -> &R { &self.remote }

  /// The local cache.
  pub fn cache(&self) -> &C { &self.cache }

  /// Produces the best available snapshot, see the [module docs](self) for the policy.
  pub async fn acquire(&self) -> Acquisition {
    let _flight = self.flight.lock().await;

    match self.fetch_bounded().await {
      Ok(Some(snapshot)) => {
        debug!("Fetched {} accounts from the remote store", snapshot.len());
        if let Err(e) = self.cache.save(&snapshot).await {
          warn!("Failed to save snapshot to the local cache: {e}");
        }
        Acquisition::Available { snapshot, provenance: Provenance::Cloud }
      },
      Ok(None) => {
        debug!("Remote store returned no data, falling back to the local cache");
        self.offline().await
      },
      Err(e) => {
        warn!("Sync failed: {e}");
        self.offline().await
      },
    }
  }

  /// Reads the local cache without contacting the remote.
  ///
  /// Useful for showing something immediately before the first [`acquire`](Self::acquire)
  /// completes.
  pub async fn load_offline(&self) -> Acquisition {
    let _flight = self.flight.lock().await;
    self.offline().await
  }

  /// Runs the fetch under [`Coordinator::with_timeout`].
  async fn fetch_bounded(&self) -> Result<Option<RawSnapshot>> {
    tokio::time::timeout(self.timeout, self.remote.fetch())
      .await
      .map_err(|_| BatchwatchError::Timeout(self.timeout))?
  }

  /// The offline path.
  async fn offline(&self) -> Acquisition { load_cached(&self.cache).await }
}

/// Reads `cache` alone, without a remote or a [`Coordinator`].
///
/// Missing, empty and unreadable caches all end in [`Acquisition::Unavailable`].
pub async fn load_cached<C: LocalCache>(cache: &C) -> Acquisition {
  match cache.load().await {
    Ok(Some(snapshot)) => {
      debug!("Loaded {} accounts from the local cache", snapshot.len());
      Acquisition::Available { snapshot, provenance: Provenance::OfflineCache }
    },
    Ok(None) => {
      debug!("Local cache is empty");
      Acquisition::Unavailable
    },
    Err(e) => {
      warn!("Failed to read the local cache: {e}");
      Acquisition::Unavailable
    },
  }
}
