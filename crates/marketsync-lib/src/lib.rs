//! Remote market data synchronization for date-partitioned archives.
//!
//! This is a facade crate that re-exports functionality from the
//! marketsync workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use marketsync_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("https://archive.example.com", TransportConfig::default())?;
//!     let remote = Arc::new(RemoteClient::new(Arc::new(transport)));
//!     let local = Arc::new(FsStorage::new("/var/lib/marketsync"));
//!
//!     let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let engine = SyncEngine::new(
//!         local,
//!         remote,
//!         Arc::new(WeekdayCalendar),
//!         SyncSettings::new(start),
//!     );
//!
//!     let targets = [SyncTarget::new("ABC@X".parse()?, DataType::Ticks)];
//!     let summary = engine.run_cycle(&targets, &CancelFlag::new()).await;
//!     println!("fetched {} dates", summary.dates_fetched);
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use marketsync_types::*;

// Re-export the wire protocol
pub use marketsync_proto::{
    AvailableDataCatalogEntry, AvailableDataQuery, CommandScope, CommandType, FileTransferCommand,
    FileTransferResult, ScopedCommand, SecurityCriteria, SecurityInfo, SecurityLookup,
    TransactionId, TransactionIdGenerator,
};

// Re-export local storage
#[cfg(feature = "storage")]
pub use marketsync_storage::{
    BoardCalendar, FsStorage, LocalStorage, PageError, PageHeader, StorageError, WeekdayCalendar,
};

// Re-export remote storage
#[cfg(feature = "remote")]
pub use marketsync_remote::{
    HttpTransport, RemoteClient, RemoteError, RemoteStorage, RemoteTransport, TransportConfig,
    TransportError,
};

// Re-export the sync engine
#[cfg(feature = "engine")]
pub use marketsync_engine::{
    CycleSummary, LogObserver, SyncEngine, SyncError, SyncObserver, SyncSettings, SyncTarget,
};

/// Prelude module for convenient imports.
///
/// ```
/// use marketsync_lib::prelude::*;
/// ```
pub mod prelude {
    pub use marketsync_types::{
        CancelFlag, DataType, DateRange, DateSet, RawDataType, SecurityId, StorageFormat,
        Timeframe,
    };

    pub use marketsync_proto::SecurityCriteria;

    #[cfg(feature = "storage")]
    pub use marketsync_storage::{FsStorage, LocalStorage, WeekdayCalendar};

    #[cfg(feature = "remote")]
    pub use marketsync_remote::{HttpTransport, RemoteClient, RemoteStorage, TransportConfig};

    #[cfg(feature = "engine")]
    pub use marketsync_engine::{SyncEngine, SyncSettings, SyncTarget};
}
