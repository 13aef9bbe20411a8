//! Documents exchanged with the remote store and the local cache.
//!
//! A [`RawSnapshot`] is the whole store document: account names mapped to an [`AccountRecord`],
//! each holding a map of [`BatchRecord`]s. Fields this crate does not interpret are kept in
//! `extra` so a snapshot written to the cache reads back as the same value.
//!
//! The store is loosely typed. A batch whose `end` or `original_name` is not a string is kept,
//! with that field treated as missing, and an account whose `batches` is `null` is an account
//! with no batches.
//!
//! ```
//! use batchwatch::snapshot;
//!
//! let snapshot = snapshot::from_slice(
//!   br#"{"atelier": {"batches": {"b1": {"end": "2024-05-01 18:00:00.123", "original_name": "Spring"}}}}"#,
//! )
//! .unwrap()
//! .unwrap();
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot["atelier"].batches["b1"].label("b1"), "Spring");
//! ```

use serde::Deserializer;
use serde_json::Value;

use super::*;

/// Account name to account record. Ordered so iteration is deterministic.
pub type RawSnapshot = BTreeMap<String, AccountRecord>;

/// One account and the batches it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
  /// Batches keyed by an opaque store key
  #[serde(default, deserialize_with = "null_as_default")]
  pub batches: BTreeMap<String, BatchRecord>,
  /// Fields of the account object this crate does not read
  #[serde(flatten)]
  pub extra:   BTreeMap<String, Value>,
}

/// A single time-boxed batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
  /// End time as `YYYY-MM-DD HH:MM:SS[.fraction]`, see [`parse_end`](crate::timestamp::parse_end)
  #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
  pub end:           Option<String>,
  /// Display label, falls back to the batch key
  #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
  pub original_name: Option<String>,
  /// Fields of the batch object this crate does not read
  #[serde(flatten)]
  pub extra:         BTreeMap<String, Value>,
}

impl BatchRecord {
  /// Creates a batch ending at `end` with no display name.
  pub fn ending(end: impl Into<String>) -> Self {
    Self { end: Some(end.into()), ..Default::default() }
  }

  /// Sets the display label.
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.original_name = Some(name.into());
    self
  }

  /// The label shown for this batch: `original_name` if present, otherwise `key`.
  pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
    self.original_name.as_deref().unwrap_or(key)
  }
}

/// Parses a store or cache document.
///
/// Returns `Ok(None)` for a document that carries no data: an empty body, JSON `null`, or an
/// empty object. Anything else that is not a valid snapshot is an error.
pub fn from_slice(bytes: &[u8]) -> Result<Option<RawSnapshot>> {
  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(None);
  }
  let snapshot: Option<RawSnapshot> = serde_json::from_slice(bytes)?;
  Ok(snapshot.filter(|s| !s.is_empty()))
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> core::result::Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>, {
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps string values and drops anything else to `None`.
fn string_or_none<'de, D>(deserializer: D) -> core::result::Result<Option<String>, D::Error>
where D: Deserializer<'de> {
  Ok(match Value::deserialize(deserializer)? {
    Value::String(s) => Some(s),
    _ => None,
  })
}
