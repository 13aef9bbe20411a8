//! Batch selection and urgency classification.
//!
//! [`resolve`] is a pure function of a snapshot and a wall-clock instant. For every account it
//! picks the batch a viewer should be looking at and describes how much time that batch has
//! left:
//!
//! - Batches whose `end` does not parse are ignored
//! - The current batch is the one with the soonest end strictly after `now`
//! - If every batch has already ended, the most recently ended one is shown instead
//! - An account without any schedulable batch is reported as `"All Batches Done"`
//!
//! # Examples
//!
//! ```
//! use batchwatch::{
//!   resolver::{resolve, UrgencyTier},
//!   snapshot::{AccountRecord, BatchRecord, RawSnapshot},
//! };
//! use chrono::NaiveDateTime;
//!
//! let mut account = AccountRecord::default();
//! account.batches.insert("b1".into(), BatchRecord::ending("2024-05-03 12:00:00").with_name("May"));
//! let snapshot = RawSnapshot::from([("atelier".to_string(), account)]);
//!
//! let now = NaiveDateTime::parse_from_str("2024-05-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
//! let statuses = resolve(&snapshot, now);
//!
//! assert_eq!(statuses[0].current_batch_label, "May");
//! assert_eq!(statuses[0].time_message, "2d 2h Left");
//! assert_eq!(statuses[0].urgency_tier, UrgencyTier::Safe);
//! ```

use crate::{
  snapshot::{AccountRecord, RawSnapshot},
  timestamp::parse_end,
};

use super::*;

/// Label used for accounts with nothing left to schedule.
pub const ALL_DONE_LABEL: &str = "All Batches Done";

/// Message used for accounts with nothing left to schedule.
pub const NO_CONTENT_MESSAGE: &str = "No Content";

/// Hours below which a running batch is critical.
const CRITICAL_HOURS: f64 = 24.0;

/// Hours below which a running batch is a warning.
const WARNING_HOURS: f64 = 48.0;

/// Coarse bucket used to prioritize viewer attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrgencyTier {
  /// The batch has already ended. [`resolve`] reports these as [`UrgencyTier::Critical`]; see
  /// [`StatusRecord::display_tier`] for telling the two apart.
  Expired,
  /// Under a day left, or overdue
  Critical,
  /// Under two days left
  Warning,
  /// Two days or more left
  Safe,
  /// No schedulable batch
  Unknown,
}

impl UrgencyTier {
  /// Tier for a batch with `hours` remaining.
  pub fn from_hours(hours: f64) -> Self {
    if hours < CRITICAL_HOURS {
      Self::Critical
    } else if hours < WARNING_HOURS {
      Self::Warning
    } else {
      Self::Safe
    }
  }
}

impl Display for UrgencyTier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Expired => write!(f, "expired"),
      Self::Critical => write!(f, "critical"),
      Self::Warning => write!(f, "warning"),
      Self::Safe => write!(f, "safe"),
      Self::Unknown => write!(f, "unknown"),
    }
  }
}

/// Presentation-ready status of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
  /// Account name as it appears in the snapshot
  pub account_name:        String,
  /// Label of the selected batch, or [`ALL_DONE_LABEL`]
  pub current_batch_label: String,
  /// Human readable time remaining or overdue
  pub time_message:        String,
  /// Urgency of the selected batch
  pub urgency_tier:        UrgencyTier,
  /// End of the selected batch
  pub batch_end:           Option<NaiveDateTime>,
  /// Whether the selected batch had already ended at resolution time, serialized as `expired`
  expired:                 bool,
}

impl StatusRecord {
  /// Status for an account with no schedulable batch.
  fn no_content(account_name: &str) -> Self {
    Self {
      account_name:        account_name.to_owned(),
      current_batch_label: ALL_DONE_LABEL.to_owned(),
      time_message:        NO_CONTENT_MESSAGE.to_owned(),
      urgency_tier:        UrgencyTier::Unknown,
      batch_end:           None,
      expired:             false,
    }
  }

  /// Whether the selected batch had already ended at resolution time.
  pub fn is_expired(&self) -> bool { self.expired }

  /// [`UrgencyTier::Expired`] for an overdue batch, otherwise the resolved tier.
  pub fn display_tier(&self) -> UrgencyTier {
    if self.expired {
      UrgencyTier::Expired
    } else {
      self.urgency_tier
    }
  }

  /// The batch end to minute precision, or `-` when there is none.
  pub fn ends_label(&self) -> String {
    self.batch_end.map_or_else(|| "-".to_owned(), |end| end.format("%Y-%m-%d %H:%M").to_string())
  }
}

/// Resolves every account in `snapshot` against `now`.
///
/// The output has exactly one [`StatusRecord`] per account, in the snapshot's iteration order.
/// Calling it twice with the same arguments yields the same output.
pub fn resolve(snapshot: &RawSnapshot, now: NaiveDateTime) -> Vec<StatusRecord> {
  snapshot.iter().map(|(name, account)| resolve_account(name, account, now)).collect()
}

/// Resolves a single account.
pub fn resolve_account(name: &str, account: &AccountRecord, now: NaiveDateTime) -> StatusRecord {
  let mut schedule: Vec<(&str, NaiveDateTime)> = account
    .batches
    .iter()
    .filter_map(|(key, batch)| {
      let end = batch.end.as_deref().and_then(parse_end);
      if end.is_none() {
        debug!("Skipping batch {key:?} of {name:?} without a usable end time");
      }
      end.map(|end| (batch.label(key), end))
    })
    .collect();

  // Stable, so equal ends keep key order.
  schedule.sort_by_key(|&(_, end)| end);

  let selected = schedule.iter().find(|&&(_, end)| end > now).or_else(|| schedule.last());
  let Some(&(label, end)) = selected else {
    return StatusRecord::no_content(name);
  };

  let hours = hours_between(now, end);
  let (time_message, urgency_tier, expired) = if hours < 0.0 {
    (format!("EXPIRED {}h ago", hours.trunc().abs() as i64), UrgencyTier::Critical, true)
  } else {
    let days = (hours / 24.0).floor() as i64;
    let hours_left = (hours % 24.0).floor() as i64;
    let message = if days > 0 {
      format!("{days}d {hours_left}h Left")
    } else {
      format!("{hours_left}h Left (Hurry!)")
    };
    (message, UrgencyTier::from_hours(hours), false)
  };

  StatusRecord {
    account_name:        name.to_owned(),
    current_batch_label: label.to_owned(),
    time_message,
    urgency_tier,
    batch_end:           Some(end),
    expired,
  }
}

/// Fractional hours from `now` until `end`, negative once `end` has passed.
fn hours_between(now: NaiveDateTime, end: NaiveDateTime) -> f64 {
  (end - now).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;

  use super::*;
  use crate::snapshot::BatchRecord;

  /// Format used for fixture end times.
  const FMT: &str = "%Y-%m-%d %H:%M:%S";

  fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-05-01 12:00:00", FMT).unwrap()
  }

  fn end_at(offset: TimeDelta) -> String { (now() + offset).format(FMT).to_string() }

  fn account(batches: &[(&str, BatchRecord)]) -> AccountRecord {
    AccountRecord {
      batches: batches.iter().map(|(k, b)| ((*k).to_owned(), b.clone())).collect(),
      ..Default::default()
    }
  }

  fn resolve_one(batches: &[(&str, BatchRecord)]) -> StatusRecord {
    resolve_account("atelier", &account(batches), now())
  }

  #[test]
  fn test_one_record_per_account() {
    let snapshot = RawSnapshot::from([
      ("empty".to_owned(), AccountRecord::default()),
      ("busy".to_owned(), account(&[("b1", BatchRecord::ending(end_at(TimeDelta::hours(3))))])),
      ("broken".to_owned(), account(&[("b1", BatchRecord::ending("soon"))])),
    ]);

    let statuses = resolve(&snapshot, now());
    assert_eq!(statuses.len(), 3);
    let mut names: Vec<_> = statuses.iter().map(|s| s.account_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["broken", "busy", "empty"]);
  }

  #[test]
  fn test_resolve_is_idempotent() {
    let snapshot = RawSnapshot::from([
      ("a".to_owned(), account(&[("b1", BatchRecord::ending(end_at(TimeDelta::hours(30))))])),
      ("b".to_owned(), account(&[("b1", BatchRecord::ending(end_at(TimeDelta::hours(-2))))])),
    ]);
    assert_eq!(resolve(&snapshot, now()), resolve(&snapshot, now()));
  }

  #[test]
  fn test_empty_account() {
    let status = resolve_one(&[]);
    assert_eq!(status.current_batch_label, ALL_DONE_LABEL);
    assert_eq!(status.time_message, NO_CONTENT_MESSAGE);
    assert_eq!(status.urgency_tier, UrgencyTier::Unknown);
    assert_eq!(status.batch_end, None);
    assert_eq!(status.ends_label(), "-");
  }

  #[test]
  fn test_selects_soonest_future_batch() {
    let status = resolve_one(&[
      ("past", BatchRecord::ending(end_at(TimeDelta::hours(-10)))),
      ("later", BatchRecord::ending(end_at(TimeDelta::hours(30)))),
      ("next", BatchRecord::ending(end_at(TimeDelta::hours(5)))),
    ]);
    assert_eq!(status.current_batch_label, "next");
    assert_eq!(status.batch_end, Some(now() + TimeDelta::hours(5)));
    assert_eq!(status.time_message, "5h Left (Hurry!)");
    assert_eq!(status.urgency_tier, UrgencyTier::Critical);
    assert!(!status.is_expired());
  }

  #[test]
  fn test_all_expired_selects_most_recent() {
    let status = resolve_one(&[
      ("older", BatchRecord::ending(end_at(TimeDelta::hours(-30)))),
      ("recent", BatchRecord::ending(end_at(TimeDelta::hours(-5)))),
    ]);
    assert_eq!(status.current_batch_label, "recent");
    assert_eq!(status.urgency_tier, UrgencyTier::Critical);
    assert_eq!(status.time_message, "EXPIRED 5h ago");
    assert!(status.is_expired());
    assert_eq!(status.display_tier(), UrgencyTier::Expired);
  }

  #[test]
  fn test_expired_hours_truncate_toward_zero() {
    let status = resolve_one(&[("b1", BatchRecord::ending(end_at(TimeDelta::minutes(-354))))]);
    assert_eq!(status.time_message, "EXPIRED 5h ago");

    let status = resolve_one(&[("b1", BatchRecord::ending(end_at(TimeDelta::minutes(-30))))]);
    assert_eq!(status.time_message, "EXPIRED 0h ago");
  }

  #[test]
  fn test_tier_boundaries() {
    let cases = [
      (TimeDelta::minutes(23 * 60 + 54), UrgencyTier::Critical),
      (TimeDelta::hours(24), UrgencyTier::Warning),
      (TimeDelta::minutes(47 * 60 + 54), UrgencyTier::Warning),
      (TimeDelta::hours(48), UrgencyTier::Safe),
    ];
    for (offset, tier) in cases {
      let status = resolve_one(&[("b1", BatchRecord::ending(end_at(offset)))]);
      assert_eq!(status.urgency_tier, tier, "offset {offset}");
    }

    assert_eq!(UrgencyTier::from_hours(0.0), UrgencyTier::Critical);
    assert_eq!(UrgencyTier::from_hours(23.9), UrgencyTier::Critical);
    assert_eq!(UrgencyTier::from_hours(24.0), UrgencyTier::Warning);
    assert_eq!(UrgencyTier::from_hours(47.9), UrgencyTier::Warning);
    assert_eq!(UrgencyTier::from_hours(48.0), UrgencyTier::Safe);
  }

  #[test]
  fn test_time_messages() {
    let cases = [
      (TimeDelta::minutes(30), "0h Left (Hurry!)"),
      (TimeDelta::minutes(23 * 60 + 59), "23h Left (Hurry!)"),
      (TimeDelta::hours(24), "1d 0h Left"),
      (TimeDelta::minutes(49 * 60 + 30), "2d 1h Left"),
      (TimeDelta::hours(24 * 9 + 7), "9d 7h Left"),
    ];
    for (offset, message) in cases {
      let status = resolve_one(&[("b1", BatchRecord::ending(end_at(offset)))]);
      assert_eq!(status.time_message, message);
    }
  }

  #[test]
  fn test_batch_ending_now_counts_as_ended() {
    let status = resolve_one(&[
      ("now", BatchRecord::ending(end_at(TimeDelta::zero()))),
      ("earlier", BatchRecord::ending(end_at(TimeDelta::hours(-1)))),
    ]);
    assert_eq!(status.current_batch_label, "now");
    assert_eq!(status.time_message, "0h Left (Hurry!)");
    assert_eq!(status.urgency_tier, UrgencyTier::Critical);
  }

  #[traced_test]
  #[test]
  fn test_unparsable_batch_is_excluded() {
    let status = resolve_one(&[
      ("a_bad", BatchRecord::ending("not-a-date")),
      ("b_missing", BatchRecord::default()),
      ("c_good", BatchRecord::ending(end_at(TimeDelta::hours(50)))),
    ]);
    assert_eq!(status.current_batch_label, "c_good");
    assert_eq!(status.urgency_tier, UrgencyTier::Safe);
    assert!(logs_contain("a_bad"));
  }

  #[test]
  fn test_only_unparsable_batches_is_no_content() {
    let status = resolve_one(&[("b1", BatchRecord::ending("2024/05/01 10:00:00"))]);
    assert_eq!(status.current_batch_label, ALL_DONE_LABEL);
    assert_eq!(status.urgency_tier, UrgencyTier::Unknown);
  }

  #[test]
  fn test_display_name_and_fraction() {
    let end = format!("{}.250000", end_at(TimeDelta::hours(72)));
    let status = resolve_one(&[("k1", BatchRecord::ending(end).with_name("Summer Boards"))]);
    assert_eq!(status.current_batch_label, "Summer Boards");
    assert_eq!(status.time_message, "3d 0h Left");
    assert_eq!(status.ends_label(), "2024-05-04 12:00");
  }

  #[test]
  fn test_equal_ends_keep_key_order() {
    let end = end_at(TimeDelta::hours(6));
    let status = resolve_one(&[
      ("k2", BatchRecord::ending(end.clone()).with_name("second")),
      ("k1", BatchRecord::ending(end).with_name("first")),
    ]);
    assert_eq!(status.current_batch_label, "first");
  }
}
