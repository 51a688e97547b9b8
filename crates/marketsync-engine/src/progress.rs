//! Progress observation and cycle accounting.

use chrono::NaiveDate;
use tracing::info;

use marketsync_types::{DataType, SecurityId};

/// Receiver of per-date progress notifications.
///
/// Notified once per persisted date with the security, the data type
/// already remapped to the current schema, the date, and the record count
/// read from the page header.
pub trait SyncObserver: Send + Sync {
    /// A date's page was fetched and persisted.
    fn data_loaded(&self, security: &SecurityId, data_type: DataType, date: NaiveDate, records: u64);
}

/// Observer writing progress to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SyncObserver for LogObserver {
    fn data_loaded(&self, security: &SecurityId, data_type: DataType, date: NaiveDate, records: u64) {
        info!(security = %security, data_type = %data_type, %date, records, "data loaded");
    }
}

/// Counters accumulated over one sync cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Pairs the cycle was asked to synchronize.
    pub pairs_total: usize,
    /// Pairs aborted by a catalog or local date query failure.
    pub pairs_failed: usize,
    /// Dates fetched, persisted, and reported.
    pub dates_fetched: usize,
    /// Dates answered with the empty sentinel.
    pub dates_empty: usize,
    /// Dates skipped as non-trading days.
    pub dates_skipped_non_trading: usize,
    /// Dates skipped because the data type has no remap table entry.
    pub dates_skipped_unmapped: usize,
    /// Dates that failed to fetch, persist, or parse.
    pub dates_failed: usize,
    /// Total records across all fetched pages.
    pub records_loaded: u64,
    /// True if the cycle exited early on cancellation.
    pub cancelled: bool,
}

impl CycleSummary {
    /// Folds another summary (e.g. one pair's counters) into this one.
    pub fn absorb(&mut self, other: &Self) {
        self.pairs_failed += other.pairs_failed;
        self.dates_fetched += other.dates_fetched;
        self.dates_empty += other.dates_empty;
        self.dates_skipped_non_trading += other.dates_skipped_non_trading;
        self.dates_skipped_unmapped += other.dates_skipped_unmapped;
        self.dates_failed += other.dates_failed;
        self.records_loaded += other.records_loaded;
        self.cancelled |= other.cancelled;
    }

    /// True if every unit of work in the cycle succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.pairs_failed == 0 && self.dates_failed == 0 && !self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_accumulates() {
        let mut total = CycleSummary {
            pairs_total: 2,
            ..CycleSummary::default()
        };
        total.absorb(&CycleSummary {
            dates_fetched: 3,
            records_loaded: 100,
            ..CycleSummary::default()
        });
        total.absorb(&CycleSummary {
            dates_failed: 1,
            cancelled: true,
            ..CycleSummary::default()
        });

        assert_eq!(total.dates_fetched, 3);
        assert_eq!(total.records_loaded, 100);
        assert_eq!(total.dates_failed, 1);
        assert!(total.cancelled);
        assert!(!total.is_clean());
    }
}
