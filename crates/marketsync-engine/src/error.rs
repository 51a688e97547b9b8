//! Sync engine errors.

use thiserror::Error;

use marketsync_remote::RemoteError;
use marketsync_storage::StorageError;
use marketsync_types::{RawDataType, SecurityId};

/// Errors aborting the cycle of one (security, data type) pair.
///
/// These never abort sibling pairs; the pair is retried on the next
/// externally scheduled cycle, which recomputes the gap from durable state.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote catalog query failed.
    #[error("Catalog query failed for {security}/{data_type}: {source}")]
    Catalog {
        /// The pair's security.
        security: SecurityId,
        /// The pair's data type.
        data_type: RawDataType,
        /// The underlying remote error.
        source: RemoteError,
    },

    /// The local date query failed.
    #[error("Local date query failed for {security}/{data_type}: {source}")]
    Local {
        /// The pair's security.
        security: SecurityId,
        /// The pair's data type.
        data_type: RawDataType,
        /// The underlying storage error.
        source: StorageError,
    },
}
