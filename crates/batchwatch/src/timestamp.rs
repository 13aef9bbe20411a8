//! Strict parsing of batch end times.
//!
//! The store writes end times as `YYYY-MM-DD HH:MM:SS`, sometimes with a fractional-seconds tail
//! (`2024-05-01 18:00:00.123456`). Everything from the first `.` is dropped and what remains must
//! match that layout exactly, including field widths. Chrono alone accepts `2024-5-1 8:0:0` for
//! the same format string, so the layout is checked before handing off to it. Chrono also
//! accepts second `60` as a leap second, which is rejected afterwards.

use chrono::Timelike;

use super::*;

/// Format passed to chrono once the layout check has succeeded.
const END_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `YYYY-MM-DD HH:MM:SS`, `D` for a digit and anything else a literal separator.
const END_LAYOUT: &[u8; 19] = b"DDDD-DD-DD DD:DD:DD";

/// Parses a batch end time, returning `None` for anything that is not a valid timestamp.
///
/// ```
/// use batchwatch::timestamp::parse_end;
///
/// assert!(parse_end("2024-05-01 18:00:00.123").is_some());
/// assert!(parse_end("2024-5-1 18:00:00").is_none());
/// assert!(parse_end("2024-05-01 18:00:60").is_none());
/// assert!(parse_end("not-a-date").is_none());
/// ```
pub fn parse_end(raw: &str) -> Option<NaiveDateTime> {
  let trimmed = raw.split('.').next().unwrap_or(raw);
  if !matches_layout(trimmed) {
    trace!("Rejecting end time with unexpected layout: {raw:?}");
    return None;
  }
  NaiveDateTime::parse_from_str(trimmed, END_FORMAT)
    .ok()
    .filter(|parsed| parsed.nanosecond() < 1_000_000_000)
}

/// Checks fixed field widths and separators.
fn matches_layout(value: &str) -> bool {
  let bytes = value.as_bytes();
  bytes.len() == END_LAYOUT.len()
    && bytes.iter().zip(END_LAYOUT).all(|(&byte, &expected)| match expected {
      b'D' => byte.is_ascii_digit(),
      separator => byte == separator,
    })
}
