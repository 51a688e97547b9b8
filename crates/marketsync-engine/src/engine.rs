//! The gap resolution and sync engine.

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use marketsync_remote::RemoteStorage;
use marketsync_storage::{BoardCalendar, LocalStorage, PageHeader};
use marketsync_types::{CancelFlag, RawDataType, SecurityId};

use crate::{CycleSummary, LogObserver, SyncError, SyncObserver, SyncSettings};

/// One (security, data type) pair a cycle synchronizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTarget {
    /// The security to synchronize.
    pub security: SecurityId,
    /// The data type to synchronize, possibly a legacy descriptor.
    pub data_type: RawDataType,
}

impl SyncTarget {
    /// Creates a new sync target.
    #[must_use]
    pub fn new(security: SecurityId, data_type: impl Into<RawDataType>) -> Self {
        Self {
            security,
            data_type: data_type.into(),
        }
    }
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.security, self.data_type)
    }
}

/// Drives gap resolution between the remote archive and the local drive.
///
/// Per pair, a cycle costs exactly one local and one remote date query in
/// the steady state (no missing dates), and per missing date one fetch and
/// one persist. The remote side is authoritative; nothing is ever written
/// back to it by a cycle.
pub struct SyncEngine {
    local: Arc<dyn LocalStorage>,
    remote: Arc<dyn RemoteStorage>,
    calendar: Arc<dyn BoardCalendar>,
    observer: Arc<dyn SyncObserver>,
    settings: SyncSettings,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SyncEngine {
    /// Creates an engine reporting progress to the structured log.
    #[must_use]
    pub fn new(
        local: Arc<dyn LocalStorage>,
        remote: Arc<dyn RemoteStorage>,
        calendar: Arc<dyn BoardCalendar>,
        settings: SyncSettings,
    ) -> Self {
        Self::with_observer(local, remote, calendar, settings, Arc::new(LogObserver))
    }

    /// Creates an engine with a custom progress observer.
    #[must_use]
    pub fn with_observer(
        local: Arc<dyn LocalStorage>,
        remote: Arc<dyn RemoteStorage>,
        calendar: Arc<dyn BoardCalendar>,
        settings: SyncSettings,
        observer: Arc<dyn SyncObserver>,
    ) -> Self {
        Self {
            local,
            remote,
            calendar,
            observer,
            settings,
        }
    }

    /// Returns the engine's settings.
    #[must_use]
    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Runs one sync cycle over the given pairs, sequentially.
    ///
    /// A failure in one pair is logged and never aborts its siblings.
    /// Cancellation is polled before every pair and every date.
    pub async fn run_cycle(&self, targets: &[SyncTarget], cancel: &CancelFlag) -> CycleSummary {
        let today = Utc::now().date_naive();
        self.run_cycle_at(targets, cancel, today, 1).await
    }

    /// Runs one sync cycle driving up to `workers` pairs concurrently.
    ///
    /// Pairs are independent: they share only the storage providers, and
    /// each pair's dates are still fetched strictly in ascending order.
    pub async fn run_cycle_concurrent(
        &self,
        targets: &[SyncTarget],
        cancel: &CancelFlag,
        workers: usize,
    ) -> CycleSummary {
        let today = Utc::now().date_naive();
        self.run_cycle_at(targets, cancel, today, workers).await
    }

    /// Cycle driver with an explicit "today", factored out for testing.
    pub(crate) async fn run_cycle_at(
        &self,
        targets: &[SyncTarget],
        cancel: &CancelFlag,
        today: NaiveDate,
        workers: usize,
    ) -> CycleSummary {
        let mut summary = CycleSummary {
            pairs_total: targets.len(),
            ..CycleSummary::default()
        };

        if targets.is_empty() {
            warn!("no securities or data types match the sync criteria");
            return summary;
        }

        let outcomes: Vec<_> = stream::iter(targets)
            .map(|target| async move {
                if cancel.is_cancelled() {
                    return (target, Ok(cancelled_stats()));
                }
                (target, self.sync_pair(target, today, cancel).await)
            })
            .buffer_unordered(workers.max(1))
            .collect()
            .await;

        for (target, outcome) in outcomes {
            match outcome {
                Ok(stats) => summary.absorb(&stats),
                Err(e) => {
                    warn!(pair = %target, error = %e, "pair cycle aborted, will retry next cycle");
                    summary.pairs_failed += 1;
                }
            }
        }

        info!(
            pairs = summary.pairs_total,
            pairs_failed = summary.pairs_failed,
            fetched = summary.dates_fetched,
            empty = summary.dates_empty,
            skipped_non_trading = summary.dates_skipped_non_trading,
            skipped_unmapped = summary.dates_skipped_unmapped,
            failed = summary.dates_failed,
            records = summary.records_loaded,
            cancelled = summary.cancelled,
            "sync cycle finished"
        );

        summary
    }

    /// Synchronizes one (security, data type) pair.
    ///
    /// Steady state (no gap) costs exactly the two date queries. A catalog
    /// or local query failure aborts only this pair; per-date failures are
    /// absorbed into the returned counters.
    async fn sync_pair(
        &self,
        target: &SyncTarget,
        today: NaiveDate,
        cancel: &CancelFlag,
    ) -> Result<CycleSummary, SyncError> {
        let mut stats = CycleSummary::default();
        let format = self.settings.format;

        let local_dates = self
            .local
            .dates(&target.security, &target.data_type, format)
            .await
            .map_err(|source| SyncError::Local {
                security: target.security.clone(),
                data_type: target.data_type.clone(),
                source,
            })?;

        let remote_dates = self
            .remote
            .dates(&target.security, &target.data_type, format)
            .await
            .map_err(|source| SyncError::Catalog {
                security: target.security.clone(),
                data_type: target.data_type.clone(),
                source,
            })?;

        let Some(window) = self.settings.window(today) else {
            debug!(pair = %target, "sync window is empty");
            return Ok(stats);
        };

        let missing = remote_dates.intersect_range(&window).difference(&local_dates);

        if missing.is_empty() {
            debug!(pair = %target, "up to date");
            return Ok(stats);
        }

        debug!(pair = %target, missing = missing.len(), "gap resolved");

        for date in missing.iter() {
            if cancel.is_cancelled() {
                info!(pair = %target, "sync cancelled");
                stats.cancelled = true;
                break;
            }

            self.sync_date(target, date, &mut stats).await;
        }

        Ok(stats)
    }

    /// Fetches, persists, remaps, and reports one missing date.
    ///
    /// Every failure here is isolated to this date: logged with full
    /// context, counted, and the loop moves on.
    async fn sync_date(&self, target: &SyncTarget, date: NaiveDate, stats: &mut CycleSummary) {
        let format = self.settings.format;

        if self.settings.ignore_weekends
            && !self.calendar.is_trade_date(&target.security, date)
        {
            info!(pair = %target, %date, "skipping non-trading date");
            stats.dates_skipped_non_trading += 1;
            return;
        }

        let page = match self
            .remote
            .load_stream(&target.security, &target.data_type, format, date)
            .await
        {
            Ok(Some(page)) => page,
            Ok(None) => {
                debug!(pair = %target, %date, "no data for date");
                stats.dates_empty += 1;
                return;
            }
            Err(e) => {
                warn!(pair = %target, %date, error = %e, "fetch failed");
                stats.dates_failed += 1;
                return;
            }
        };

        if let Err(e) = self
            .local
            .save(&target.security, &target.data_type, format, date, &page)
            .await
        {
            warn!(pair = %target, %date, error = %e, "persist failed");
            stats.dates_failed += 1;
            return;
        }

        let records = match PageHeader::parse(format, &page) {
            Ok(header) => header.record_count,
            Err(e) => {
                warn!(pair = %target, %date, error = %e, "corrupt page header");
                stats.dates_failed += 1;
                return;
            }
        };

        let resolved = match target.data_type.resolve() {
            Ok(data_type) => data_type,
            Err(e) => {
                warn!(pair = %target, %date, error = %e, "data type has no remap entry");
                stats.dates_skipped_unmapped += 1;
                return;
            }
        };

        self.observer
            .data_loaded(&target.security, resolved, date, records);
        stats.dates_fetched += 1;
        stats.records_loaded += records;
    }
}

fn cancelled_stats() -> CycleSummary {
    CycleSummary {
        cancelled: true,
        ..CycleSummary::default()
    }
}
