//! [`LocalCache`] backed by a single JSON file.
//!
//! Saves go through a temporary file in the same directory which is then renamed over the
//! target, so an interrupted save leaves the previous snapshot intact. The write runs on tokio's
//! blocking pool.

use std::{fs, io::Write};

use tempfile::NamedTempFile;

use super::*;
use crate::snapshot;

/// Keeps the last fetched snapshot in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCache {
  /// Cache file location
  path: PathBuf,
}

impl FileCache {
  /// Creates a cache at `path`. Nothing is touched until the first save.
  pub fn new(path: impl AsRef<Path>) -> Self { Self { path: path.as_ref().to_path_buf() } }

  /// The cache file location.
  pub fn path(&self) -> &Path { &self.path }

  /// Deletes the cache file. Returns `false` if there was nothing to delete.
  pub fn clear(&self) -> Result<bool> {
    match fs::remove_file(&self.path) {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(e.into()),
    }
  }
}

#[async_trait]
impl LocalCache for FileCache {
  async fn load(&self) -> Result<Option<RawSnapshot>> {
    let bytes = match tokio::fs::read(&self.path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!("No cached snapshot at {}", self.path.display());
        return Ok(None);
      },
      Err(e) => return Err(e.into()),
    };
    snapshot::from_slice(&bytes)
  }

  async fn save(&self, snapshot: &RawSnapshot) -> Result<()> {
    let bytes = serde_json::to_vec(snapshot)?;
    let path = self.path.clone();
    tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
      .await
      .map_err(|e| BatchwatchError::Path(std::io::Error::other(e)))??;
    debug!("Saved snapshot to {}", self.path.display());
    Ok(())
  }
}

/// Writes `bytes` to a temporary file next to `path`, syncs it, and renames it over `path`.
///
/// Blocking, run it off the async workers.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  };
  fs::create_dir_all(&dir)?;

  let mut file = NamedTempFile::new_in(&dir)?;
  file.write_all(bytes)?;
  file.as_file().sync_all()?;
  file.persist(path)?;
  Ok(())
}
