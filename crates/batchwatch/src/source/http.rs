//! [`RemoteSource`] backed by a REST JSON document endpoint.
//!
//! The store is read with a single `GET` of [`RemoteConfig::endpoint`]. A `200` with a body of
//! `null`, `{}`, or nothing at all means the store is empty; any other status is an error.

use reqwest::{Client, StatusCode, Url};

use super::*;
use crate::{config::RemoteConfig, snapshot};

/// Reads snapshots over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
  /// HTTP client, carries the request timeout
  client:   Client,
  /// Full document URL
  endpoint: Url,
}

impl HttpSource {
  /// Builds a source for the endpoint and timeout in `config`.
  ///
  /// # Errors
  ///
  /// Returns [`BatchwatchError::Config`] for an invalid endpoint and
  /// [`BatchwatchError::Network`] if the HTTP client cannot be built.
  pub fn new(config: &RemoteConfig) -> Result<Self> {
    let endpoint = config.endpoint()?;
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { client, endpoint })
  }

  /// The document URL this source reads.
  pub fn endpoint(&self) -> &Url { &self.endpoint }
}

#[async_trait]
impl RemoteSource for HttpSource {
  async fn fetch(&self) -> Result<Option<RawSnapshot>> {
    debug!("Fetching snapshot from {}", self.endpoint);
    let response = self.client.get(self.endpoint.clone()).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
      trace!("Snapshot response: {response:?}");
      return Err(BatchwatchError::Status(status));
    }

    let bytes = response.bytes().await?;
    trace!("Received {} bytes", bytes.len());
    snapshot::from_slice(&bytes)
  }
}
