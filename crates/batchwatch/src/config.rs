//! Configuration for the remote store and the local snapshot cache.
//!
//! A [`Config`] is stored as TOML, by default at [`Config::default_path`]:
//!
//! ```toml
//! [remote]
//! base_url = "https://my-project-default-rtdb.firebaseio.com"
//! path = "accounts.json"
//! timeout_secs = 10
//!
//! [cache]
//! path = "/home/me/.local/share/batchwatch/snapshot.json"
//! ```
//!
//! Every field is optional. The environment variables `BATCHWATCH_REMOTE_URL`,
//! `BATCHWATCH_CACHE_PATH` and `BATCHWATCH_TIMEOUT_SECS` take precedence over the file.

use std::{env, fs};

use super::*;

/// Environment override for [`RemoteConfig::base_url`].
pub const REMOTE_URL_ENV: &str = "BATCHWATCH_REMOTE_URL";
/// Environment override for [`CacheConfig::path`].
pub const CACHE_PATH_ENV: &str = "BATCHWATCH_CACHE_PATH";
/// Environment override for [`RemoteConfig::timeout_secs`].
pub const TIMEOUT_ENV: &str = "BATCHWATCH_TIMEOUT_SECS";

/// Top level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// Where snapshots are fetched from
  #[serde(default)]
  pub remote: RemoteConfig,
  /// Where the last fetched snapshot is kept
  #[serde(default)]
  pub cache:  CacheConfig,
}

/// Remote document store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
  /// Root of the store, e.g. a Realtime Database URL
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  /// Document path below `base_url`
  #[serde(default = "default_document_path")]
  pub path:         String,
  /// Upper bound on a single fetch, in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      base_url:     default_base_url(),
      path:         default_document_path(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl RemoteConfig {
  /// The fetch timeout as a [`Duration`], never shorter than one second.
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs.max(1)) }

  /// Joins `base_url` and `path` into the document URL.
  ///
  /// # Errors
  ///
  /// Returns [`BatchwatchError::Config`] if the result is not an absolute URL.
  pub fn endpoint(&self) -> Result<reqwest::Url> {
    let joined = format!(
      "{}/{}",
      self.base_url.trim_end_matches('/'),
      self.path.trim_start_matches('/')
    );
    reqwest::Url::parse(&joined)
      .map_err(|e| BatchwatchError::Config(format!("Invalid remote URL {joined:?}: {e}")))
  }
}

/// Local snapshot cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
  /// JSON file holding the last fetched snapshot
  #[serde(default = "default_cache_path")]
  pub path: PathBuf,
}

impl Default for CacheConfig {
  fn default() -> Self { Self { path: default_cache_path() } }
}

impl Config {
  /// Returns the default configuration file location.
  ///
  /// - On Unix: `~/.config/batchwatch/config.toml`
  /// - On macOS: `~/Library/Application Support/batchwatch/config.toml`
  /// - On Windows: `%APPDATA%\batchwatch\config.toml`
  /// - Fallback: `./batchwatch/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("batchwatch").join("config.toml")
  }

  /// Reads a configuration file and applies environment overrides.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)?;
    let mut config: Self = toml::from_str(&content)?;
    config.apply_env_overrides();
    Ok(config)
  }

  /// Loads `path` if given, otherwise [`Config::default_path`] if it exists, otherwise the
  /// defaults. Environment overrides apply in every case.
  pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
    if let Some(path) = path {
      return Self::load(path);
    }
    let default_path = Self::default_path();
    if default_path.exists() {
      Self::load(default_path)
    } else {
      debug!("No configuration at {}, using defaults", default_path.display());
      let mut config = Self::default();
      config.apply_env_overrides();
      Ok(config)
    }
  }

  /// Writes this configuration as TOML, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Sets the store root URL.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.remote.base_url = base_url.into();
    self
  }

  /// Sets the snapshot cache file.
  pub fn with_cache_path(mut self, path: impl AsRef<Path>) -> Self {
    self.cache.path = path.as_ref().to_path_buf();
    self
  }

  /// Sets the fetch timeout.
  pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
    self.remote.timeout_secs = timeout_secs;
    self
  }

  /// Replaces fields with the `BATCHWATCH_*` environment variables that are set.
  fn apply_env_overrides(&mut self) {
    if let Ok(url) = env::var(REMOTE_URL_ENV) {
      self.remote.base_url = url;
    }
    if let Ok(path) = env::var(CACHE_PATH_ENV) {
      self.cache.path = PathBuf::from(path);
    }
    if let Ok(timeout) = env::var(TIMEOUT_ENV) {
      match timeout.parse::<u64>() {
        Ok(value) => self.remote.timeout_secs = value,
        Err(_) => warn!("Ignoring {TIMEOUT_ENV}={timeout:?}, expected whole seconds"),
      }
    }
  }
}

/// Default [`RemoteConfig::base_url`].
// NOTE: Local Realtime Database emulator, real deployments set their project URL.
fn default_base_url() -> String { "http://127.0.0.1:9000".to_owned() }

/// Default [`RemoteConfig::path`].
fn default_document_path() -> String { "accounts.json".to_owned() }

/// Default [`RemoteConfig::timeout_secs`].
fn default_timeout_secs() -> u64 { 10 }

/// Default [`CacheConfig::path`], under the platform data directory.
fn default_cache_path() -> PathBuf {
  dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("batchwatch").join("snapshot.json")
}
