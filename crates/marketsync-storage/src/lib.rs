//! Local date-partitioned storage for marketsync.
//!
//! - [`LocalStorage`] - the provider trait the sync engine consumes
//! - [`FsStorage`] - filesystem drive with atomic rename-on-write saves
//! - [`PageHeader`] - metadata header parse yielding a record count
//! - [`BoardCalendar`] / [`WeekdayCalendar`] - trading day calendars

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod calendar;
mod error;
mod fs;
mod page;
mod provider;

pub use calendar::{BoardCalendar, WeekdayCalendar};
pub use error::{PageError, StorageError};
pub use fs::FsStorage;
pub use page::{BINARY_HEADER_LEN, PAGE_MAGIC, PAGE_VERSION, PageHeader};
pub use provider::LocalStorage;
