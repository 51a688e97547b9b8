//! Wire messages for marketsync market data synchronization.
//!
//! Two protocol pairs share one correlation discipline:
//!
//! - [`AvailableDataQuery`] / [`AvailableDataCatalogEntry`] - the catalog
//!   protocol, answering "which dates exist for (security, data type,
//!   format)?"
//! - [`FileTransferCommand`] / [`FileTransferResult`] - the file transfer
//!   protocol, carrying the serialized page for one date
//!
//! plus [`ScopedCommand`], the generic envelope for administrative
//! operations that are not date-file reads, and
//! [`SecurityLookup`] / [`SecurityInfo`] for security catalog discovery.
//!
//! Every request carries a fresh [`TransactionId`]; every response carries
//! the originating id. A response whose id does not match an in-flight
//! request must be discarded.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod messages;
mod transaction;

pub use messages::{
    AvailableDataCatalogEntry, AvailableDataQuery, CommandScope, CommandType, FileTransferCommand,
    FileTransferResult, ScopedCommand, SecurityCriteria, SecurityInfo, SecurityLookup,
};
pub use transaction::{TransactionId, TransactionIdGenerator};
