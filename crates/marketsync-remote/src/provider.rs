//! The remote storage provider contract.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use std::collections::HashSet;

use marketsync_proto::SecurityCriteria;
use marketsync_types::{CancelFlag, DateRange, DateSet, RawDataType, SecurityId, StorageFormat};

use crate::RemoteError;

/// Remote side of the synchronization: the authoritative archive.
///
/// The local side is only a cache of this data; no conflict resolution is
/// attempted beyond "remote wins".
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Returns the dates for which the archive stores a page, via one
    /// catalog protocol round trip.
    async fn dates(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
    ) -> Result<DateSet, RemoteError>;

    /// Returns every data type the archive stores for a security.
    async fn available_data_types(
        &self,
        security: &SecurityId,
        format: Option<StorageFormat>,
    ) -> Result<Vec<RawDataType>, RemoteError>;

    /// Fetches the serialized page for one date.
    ///
    /// Returns `None` for the "no data exists for this date" sentinel,
    /// which is a successful outcome, never an error.
    async fn load_stream(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> Result<Option<Bytes>, RemoteError>;

    /// Uploads the serialized page for one date.
    async fn save_stream(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
        body: Vec<u8>,
    ) -> Result<(), RemoteError>;

    /// Removes stored pages over a date range.
    async fn delete(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        range: DateRange,
    ) -> Result<(), RemoteError>;

    /// Discovers securities known to the archive but absent from `known`,
    /// invoking `on_new` once per new security.
    ///
    /// The cancellation flag is polled between batches; a cancelled
    /// refresh returns the count discovered so far.
    async fn refresh(
        &self,
        criteria: &SecurityCriteria,
        known: &HashSet<SecurityId>,
        on_new: &mut (dyn FnMut(SecurityId) + Send),
        cancel: &CancelFlag,
    ) -> Result<usize, RemoteError>;
}
