//! Typed sync task configuration.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use marketsync_types::{DateRange, StorageFormat};

/// Configuration of one sync task.
///
/// These are explicit typed values handed to the engine up front, not
/// looked up from a settings bag at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Earliest date a cycle considers.
    pub start_from: NaiveDate,
    /// Number of most recent days excluded from the window; the window end
    /// is today minus this offset. Keeps a cycle away from days the remote
    /// archive may still be writing.
    pub offset_days: u32,
    /// Skip dates that are not trading days on the security's board.
    pub ignore_weekends: bool,
    /// Storage format to synchronize.
    pub format: StorageFormat,
}

impl SyncSettings {
    /// Creates settings with the given window start, a zero offset, weekend
    /// skipping enabled, and binary format.
    #[must_use]
    pub const fn new(start_from: NaiveDate) -> Self {
        Self {
            start_from,
            offset_days: 0,
            ignore_weekends: true,
            format: StorageFormat::Binary,
        }
    }

    /// Sets the most-recent-days offset.
    #[must_use]
    pub const fn with_offset_days(mut self, offset_days: u32) -> Self {
        self.offset_days = offset_days;
        self
    }

    /// Sets whether non-trading dates are skipped.
    #[must_use]
    pub const fn with_ignore_weekends(mut self, ignore_weekends: bool) -> Self {
        self.ignore_weekends = ignore_weekends;
        self
    }

    /// Sets the storage format to synchronize.
    #[must_use]
    pub const fn with_format(mut self, format: StorageFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the window `[start_from, today - offset_days]` a cycle
    /// considers, or `None` when the offset pushes the end before the
    /// start (nothing to do yet).
    #[must_use]
    pub fn window(&self, today: NaiveDate) -> Option<DateRange> {
        let end = today.checked_sub_days(Days::new(u64::from(self.offset_days)))?;
        DateRange::new(self.start_from, end).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_window_spans_start_to_today() {
        let settings = SyncSettings::new(d(2024, 1, 1));
        let window = settings.window(d(2024, 1, 5)).unwrap();
        assert_eq!(window.start, d(2024, 1, 1));
        assert_eq!(window.end, d(2024, 1, 5));
    }

    #[test]
    fn test_window_applies_offset() {
        let settings = SyncSettings::new(d(2024, 1, 1)).with_offset_days(2);
        let window = settings.window(d(2024, 1, 5)).unwrap();
        assert_eq!(window.end, d(2024, 1, 3));
    }

    #[test]
    fn test_window_empty_when_offset_crosses_start() {
        let settings = SyncSettings::new(d(2024, 1, 4)).with_offset_days(3);
        assert!(settings.window(d(2024, 1, 5)).is_none());
    }
}
