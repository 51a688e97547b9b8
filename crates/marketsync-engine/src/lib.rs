//! Gap resolution and sync engine for marketsync.
//!
//! The engine treats the remote archive as authoritative and the local
//! drive as a cache. Per (security, data type) pair it issues exactly one
//! local and one remote date query, computes the ordered missing-date set
//! within the configured window, and fetches, persists, remaps, and
//! reports each missing date in ascending order. Failures are isolated per
//! unit of work; cancellation is cooperative and never leaves a partially
//! written page.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod progress;
mod settings;

pub use engine::{SyncEngine, SyncTarget};
pub use error::SyncError;
pub use progress::{CycleSummary, LogObserver, SyncObserver};
pub use settings::SyncSettings;
