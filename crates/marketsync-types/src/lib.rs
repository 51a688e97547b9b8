//! Core types for marketsync market data synchronization.
//!
//! This crate provides the fundamental data structures used throughout
//! marketsync:
//!
//! - [`SecurityId`] - Identifier of a tradable instrument (code + board)
//! - [`DataType`] / [`RawDataType`] - Market data stream descriptors
//! - [`Timeframe`] - Candle aggregation interval
//! - [`StorageFormat`] - Serialization format of stored pages
//! - [`DateSet`] / [`DateRange`] - Ordered date sets and inclusive day ranges
//! - [`CancelFlag`] - Shared cooperative cancellation flag

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cancel;
mod data_type;
mod date_set;
mod error;
mod format;
mod security;
mod timeframe;

pub use cancel::CancelFlag;
pub use data_type::{DataType, RawDataType, resolve_data_type};
pub use date_set::{DateRange, DateSet, DayIterator};
pub use error::{DataTypeParseError, DateRangeError, SecurityIdParseError};
pub use format::{StorageFormat, StorageFormatParseError};
pub use security::SecurityId;
pub use timeframe::{Timeframe, TimeframeParseError};
