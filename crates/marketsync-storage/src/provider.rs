//! The local storage provider contract.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;

use marketsync_types::{DateSet, RawDataType, SecurityId, StorageFormat};

use crate::StorageError;

/// Local side of the synchronization: a date-partitioned cache of market
/// data pages.
///
/// A (security, data type, format, date) tuple identifies at most one
/// stored page. Implementations must serialize writes to the same tuple
/// (or persist atomically) but need no global lock: distinct tuples never
/// collide.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Returns the dates for which a page is stored locally.
    async fn dates(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
    ) -> Result<DateSet, StorageError>;

    /// Persists the verbatim page for one date.
    ///
    /// The write must be atomic: a reader (or a crash) never observes a
    /// partially written page.
    async fn save(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
        body: &[u8],
    ) -> Result<(), StorageError>;

    /// Loads the stored page for one date, or `None` if absent.
    async fn load(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> Result<Option<Bytes>, StorageError>;

    /// Deletes the stored page for one date, if present.
    async fn delete(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> Result<(), StorageError>;
}
