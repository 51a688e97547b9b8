//! Protocol client implementing [`RemoteStorage`] over a transport.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use marketsync_proto::{
    AvailableDataQuery, FileTransferCommand, ScopedCommand, SecurityCriteria, SecurityLookup,
    TransactionIdGenerator,
};
use marketsync_types::{CancelFlag, DateRange, DateSet, RawDataType, SecurityId, StorageFormat};

use crate::{RemoteError, RemoteStorage, RemoteTransport};

/// How long a fetched date set stays fresh before the next [`RemoteStorage::dates`]
/// call issues a new catalog query.
pub const DATES_CACHE_TTL: Duration = Duration::from_secs(3);

type CacheKey = (SecurityId, RawDataType, StorageFormat);

/// Client for a remote market data archive.
///
/// Sends protocol messages over a [`RemoteTransport`], allocates a fresh
/// transaction id per request, and discards responses whose
/// `original_transaction_id` does not match. Date sets are cached briefly
/// per (security, data type, format) so diagnostics asking alongside the
/// sync engine do not double the catalog traffic.
pub struct RemoteClient {
    transport: Arc<dyn RemoteTransport>,
    ids: TransactionIdGenerator,
    dates_cache: Mutex<HashMap<CacheKey, (Instant, DateSet)>>,
    cache_ttl: Duration,
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl RemoteClient {
    /// Creates a client over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self::with_cache_ttl(transport, DATES_CACHE_TTL)
    }

    /// Creates a client with a custom date cache lifetime.
    ///
    /// A zero duration disables caching.
    #[must_use]
    pub fn with_cache_ttl(transport: Arc<dyn RemoteTransport>, cache_ttl: Duration) -> Self {
        Self {
            transport,
            ids: TransactionIdGenerator::new(),
            dates_cache: Mutex::new(HashMap::new()),
            cache_ttl,
        }
    }

    fn cached_dates(&self, key: &CacheKey) -> Option<DateSet> {
        let cache = self.dates_cache.lock().ok()?;
        let (fetched_at, dates) = cache.get(key)?;
        (fetched_at.elapsed() < self.cache_ttl).then(|| dates.clone())
    }

    fn store_dates(&self, key: CacheKey, dates: &DateSet) {
        if let Ok(mut cache) = self.dates_cache.lock() {
            cache.insert(key, (Instant::now(), dates.clone()));
        }
    }
}

#[async_trait]
impl RemoteStorage for RemoteClient {
    async fn dates(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
    ) -> Result<DateSet, RemoteError> {
        let key = (security.clone(), data_type.clone(), format);

        if let Some(dates) = self.cached_dates(&key) {
            debug!(security = %security, data_type = %data_type, "dates served from cache");
            return Ok(dates);
        }

        let query = AvailableDataQuery {
            security: security.clone(),
            data_type: Some(data_type.clone()),
            format: Some(format),
            transaction_id: self.ids.next_id(),
        };

        let entries = self.transport.query_available(&query).await?;

        let mut dates = DateSet::new();
        for entry in entries {
            if entry.original_transaction_id != query.transaction_id {
                warn!(
                    expected = query.transaction_id,
                    got = entry.original_transaction_id,
                    "discarding catalog entry with mismatched correlation id"
                );
                continue;
            }
            dates.merge(&entry.dates);
        }

        self.store_dates(key, &dates);
        Ok(dates)
    }

    async fn available_data_types(
        &self,
        security: &SecurityId,
        format: Option<StorageFormat>,
    ) -> Result<Vec<RawDataType>, RemoteError> {
        let query = AvailableDataQuery {
            security: security.clone(),
            data_type: None,
            format,
            transaction_id: self.ids.next_id(),
        };

        let entries = self.transport.query_available(&query).await?;

        let mut seen = HashSet::new();
        let mut data_types = Vec::new();
        for entry in entries {
            if entry.original_transaction_id != query.transaction_id {
                warn!(
                    expected = query.transaction_id,
                    got = entry.original_transaction_id,
                    "discarding catalog entry with mismatched correlation id"
                );
                continue;
            }
            if seen.insert(entry.data_type.clone()) {
                data_types.push(entry.data_type);
            }
        }

        Ok(data_types)
    }

    async fn load_stream(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> Result<Option<Bytes>, RemoteError> {
        let command = FileTransferCommand::get(
            security.clone(),
            data_type.clone(),
            format,
            date,
            self.ids.next_id(),
        );

        let results = self.transport.file_command(&command).await?;

        let page = results.into_iter().find(|result| {
            if result.original_transaction_id != command.transaction_id {
                warn!(
                    expected = command.transaction_id,
                    got = result.original_transaction_id,
                    "discarding file result with mismatched correlation id"
                );
                return false;
            }
            true
        });

        // No result at all and the zero-length body both mean "no data
        // exists for this date".
        Ok(page
            .filter(|result| !result.is_sentinel())
            .map(|result| Bytes::from(result.body)))
    }

    async fn save_stream(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
        body: Vec<u8>,
    ) -> Result<(), RemoteError> {
        let command = FileTransferCommand::update(
            security.clone(),
            data_type.clone(),
            format,
            date,
            body,
            self.ids.next_id(),
        );

        self.transport.file_command(&command).await?;
        Ok(())
    }

    async fn delete(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        range: DateRange,
    ) -> Result<(), RemoteError> {
        let command = ScopedCommand::remove_files(
            security.clone(),
            data_type.clone(),
            format,
            range.start,
            range.end,
            self.ids.next_id(),
        );

        self.transport.scoped_command(&command).await?;
        Ok(())
    }

    async fn refresh(
        &self,
        criteria: &SecurityCriteria,
        known: &HashSet<SecurityId>,
        on_new: &mut (dyn FnMut(SecurityId) + Send),
        cancel: &CancelFlag,
    ) -> Result<usize, RemoteError> {
        let lookup = SecurityLookup {
            criteria: criteria.clone(),
            transaction_id: self.ids.next_id(),
        };

        let infos = self.transport.lookup_securities(&lookup).await?;

        let mut discovered = 0;
        for info in infos {
            if cancel.is_cancelled() {
                debug!(discovered, "security refresh cancelled");
                break;
            }

            if info.original_transaction_id != lookup.transaction_id {
                warn!(
                    expected = lookup.transaction_id,
                    got = info.original_transaction_id,
                    "discarding security info with mismatched correlation id"
                );
                continue;
            }

            if known.contains(&info.security) || !criteria.matches(&info.security) {
                continue;
            }

            on_new(info.security);
            discovered += 1;
        }

        Ok(discovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransportError;
    use marketsync_proto::{
        AvailableDataCatalogEntry, FileTransferResult, SecurityInfo, TransactionId,
    };
    use marketsync_types::DataType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sec() -> SecurityId {
        SecurityId::new("ABC", "X")
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    /// Transport answering from canned data, echoing correlation ids unless
    /// told to garble them.
    #[derive(Default)]
    struct FakeTransport {
        dates: Vec<NaiveDate>,
        extra_dates: Vec<NaiveDate>,
        body: Option<Vec<u8>>,
        securities: Vec<SecurityId>,
        garble_correlation: bool,
        catalog_queries: AtomicUsize,
    }

    impl FakeTransport {
        fn correlation(&self, request_id: TransactionId) -> TransactionId {
            if self.garble_correlation {
                request_id + 1000
            } else {
                request_id
            }
        }
    }

    #[async_trait]
    impl RemoteTransport for FakeTransport {
        async fn query_available(
            &self,
            query: &AvailableDataQuery,
        ) -> Result<Vec<AvailableDataCatalogEntry>, TransportError> {
            self.catalog_queries.fetch_add(1, Ordering::SeqCst);
            let data_type = query
                .data_type
                .clone()
                .unwrap_or_else(|| DataType::Ticks.to_raw());
            let format = query.format.unwrap_or_default();

            // Split the catalog across two correlated entries.
            let mut entries = vec![AvailableDataCatalogEntry {
                security: query.security.clone(),
                data_type: data_type.clone(),
                dates: self.dates.iter().copied().collect(),
                format,
                original_transaction_id: self.correlation(query.transaction_id),
            }];
            if !self.extra_dates.is_empty() {
                entries.push(AvailableDataCatalogEntry {
                    security: query.security.clone(),
                    data_type,
                    dates: self.extra_dates.iter().copied().collect(),
                    format,
                    original_transaction_id: self.correlation(query.transaction_id),
                });
            }
            Ok(entries)
        }

        async fn file_command(
            &self,
            command: &FileTransferCommand,
        ) -> Result<Vec<FileTransferResult>, TransportError> {
            Ok(vec![FileTransferResult {
                security: command.security.clone(),
                data_type: command.data_type.clone(),
                date: command.from,
                format: command.format,
                body: self.body.clone().unwrap_or_default(),
                original_transaction_id: self.correlation(command.transaction_id),
            }])
        }

        async fn scoped_command(&self, _command: &ScopedCommand) -> Result<(), TransportError> {
            Ok(())
        }

        async fn lookup_securities(
            &self,
            lookup: &SecurityLookup,
        ) -> Result<Vec<SecurityInfo>, TransportError> {
            Ok(self
                .securities
                .iter()
                .cloned()
                .map(|security| SecurityInfo {
                    security,
                    original_transaction_id: self.correlation(lookup.transaction_id),
                })
                .collect())
        }
    }

    fn client(transport: FakeTransport) -> RemoteClient {
        RemoteClient::with_cache_ttl(Arc::new(transport), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_dates_merges_streamed_entries() {
        let client = client(FakeTransport {
            dates: vec![d(1), d(2)],
            extra_dates: vec![d(2), d(4)],
            ..FakeTransport::default()
        });

        let dates = client
            .dates(&sec(), &DataType::Ticks.to_raw(), StorageFormat::Binary)
            .await
            .unwrap();
        assert_eq!(dates.iter().collect::<Vec<_>>(), vec![d(1), d(2), d(4)]);
    }

    #[tokio::test]
    async fn test_dates_discards_mismatched_correlation() {
        let client = client(FakeTransport {
            dates: vec![d(1), d(2)],
            garble_correlation: true,
            ..FakeTransport::default()
        });

        let dates = client
            .dates(&sec(), &DataType::Ticks.to_raw(), StorageFormat::Binary)
            .await
            .unwrap();
        assert!(dates.is_empty());
    }

    #[tokio::test]
    async fn test_dates_cache_avoids_requery() {
        let transport = Arc::new(FakeTransport {
            dates: vec![d(1)],
            ..FakeTransport::default()
        });
        let client = RemoteClient::with_cache_ttl(transport.clone(), Duration::from_secs(60));
        let ticks = DataType::Ticks.to_raw();

        client
            .dates(&sec(), &ticks, StorageFormat::Binary)
            .await
            .unwrap();
        client
            .dates(&sec(), &ticks, StorageFormat::Binary)
            .await
            .unwrap();

        assert_eq!(transport.catalog_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_stream_sentinel_is_none() {
        let client = client(FakeTransport {
            body: Some(Vec::new()),
            ..FakeTransport::default()
        });

        let page = client
            .load_stream(&sec(), &DataType::Ticks.to_raw(), StorageFormat::Binary, d(2))
            .await
            .unwrap();
        assert!(page.is_none());
    }

    #[tokio::test]
    async fn test_load_stream_returns_body() {
        let client = client(FakeTransport {
            body: Some(b"page bytes".to_vec()),
            ..FakeTransport::default()
        });

        let page = client
            .load_stream(&sec(), &DataType::Ticks.to_raw(), StorageFormat::Binary, d(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&page[..], b"page bytes");
    }

    #[tokio::test]
    async fn test_refresh_reports_only_new_matching_securities() {
        let client = client(FakeTransport {
            securities: vec![
                SecurityId::new("ABC", "X"),
                SecurityId::new("DEF", "X"),
                SecurityId::new("GHI", "Y"),
            ],
            ..FakeTransport::default()
        });

        let known: HashSet<_> = [SecurityId::new("ABC", "X")].into_iter().collect();
        let criteria = SecurityCriteria {
            code_like: None,
            board: Some("X".to_string()),
        };

        let mut found = Vec::new();
        let count = client
            .refresh(&criteria, &known, &mut |s| found.push(s), &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(found, vec![SecurityId::new("DEF", "X")]);
    }

    #[tokio::test]
    async fn test_refresh_stops_on_cancellation() {
        let client = client(FakeTransport {
            securities: (0..100)
                .map(|i| SecurityId::new(format!("S{i}"), "X"))
                .collect(),
            ..FakeTransport::default()
        });

        let cancel = CancelFlag::new();
        cancel.cancel();

        let mut found = Vec::new();
        let count = client
            .refresh(
                &SecurityCriteria::default(),
                &HashSet::new(),
                &mut |s| found.push(s),
                &cancel,
            )
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(found.is_empty());
    }
}
