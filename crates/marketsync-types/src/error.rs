//! Error types shared across the workspace.

use chrono::NaiveDate;
use thiserror::Error;

use crate::TimeframeParseError;

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}

/// Error parsing a security identifier from its `CODE@BOARD` rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityIdParseError {
    /// The string carries no `@` separator.
    #[error("Security id '{0}' has no board separator")]
    MissingBoard(String),
    /// Code or board part is empty.
    #[error("Security id '{0}' has an empty code or board")]
    Empty(String),
}

/// Error resolving a wire data type identifier to the current schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataTypeParseError {
    /// The identifier has no entry in the remap table.
    #[error("Unknown data type: {message_type}{}", arg.as_deref().map(|a| format!(":{a}")).unwrap_or_default())]
    Unknown {
        /// The wire message type name.
        message_type: String,
        /// The wire argument, if any.
        arg: Option<String>,
    },
    /// A candle identifier arrived without its timeframe argument.
    #[error("Data type {message_type} requires an argument")]
    MissingArg {
        /// The wire message type name.
        message_type: String,
    },
    /// The candle timeframe argument could not be parsed.
    #[error("Bad timeframe argument for {message_type}: {source}")]
    BadTimeframe {
        /// The wire message type name.
        message_type: String,
        /// The underlying parse error.
        source: TimeframeParseError,
    },
}
