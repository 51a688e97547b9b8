//! The transport contract the protocol client runs over.

use async_trait::async_trait;

use marketsync_proto::{
    AvailableDataCatalogEntry, AvailableDataQuery, FileTransferCommand, FileTransferResult,
    ScopedCommand, SecurityInfo, SecurityLookup,
};

use crate::TransportError;

/// One round trip of the marketsync protocols.
///
/// A transport carries a request to the remote archive and returns every
/// response produced for it, in arrival order. Responses are finite
/// sequences, never unbounded streams; a large catalog simply arrives as
/// several entries. Correlation checking is the caller's job.
///
/// Every operation must observe a bounded timeout so a stalled endpoint
/// surfaces as an error rather than blocking a sync cycle indefinitely.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Executes a catalog query.
    async fn query_available(
        &self,
        query: &AvailableDataQuery,
    ) -> Result<Vec<AvailableDataCatalogEntry>, TransportError>;

    /// Executes a file transfer command.
    ///
    /// A read resolves to at most one result per date; uploads and deletes
    /// return an empty sequence.
    async fn file_command(
        &self,
        command: &FileTransferCommand,
    ) -> Result<Vec<FileTransferResult>, TransportError>;

    /// Executes a generic scoped command.
    async fn scoped_command(&self, command: &ScopedCommand) -> Result<(), TransportError>;

    /// Executes a security catalog lookup.
    async fn lookup_securities(
        &self,
        lookup: &SecurityLookup,
    ) -> Result<Vec<SecurityInfo>, TransportError>;
}
