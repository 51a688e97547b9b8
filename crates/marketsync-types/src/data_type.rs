//! Market data stream descriptors and the legacy identifier remap table.

use serde::{Deserialize, Serialize};

use crate::{DataTypeParseError, Timeframe};

/// A market data stream in the current schema: a kind plus a kind-dependent
/// argument (a timeframe for candles, absent otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Trade ticks (`ExecutionMessage` with the `Tick` argument).
    Ticks,
    /// Order log entries (`ExecutionMessage` with the `OrderLog` argument).
    OrderLog,
    /// Own transactions (`ExecutionMessage` with the `Transaction` argument).
    Transactions,
    /// Level 1 field changes.
    Level1,
    /// Order book (market depth) changes.
    Quotes,
    /// Time frame candles with the given aggregation interval.
    Candles(Timeframe),
}

impl DataType {
    /// Returns the current-schema message type name carried on the wire.
    #[must_use]
    pub const fn message_type(&self) -> &'static str {
        match self {
            Self::Ticks | Self::OrderLog | Self::Transactions => "ExecutionMessage",
            Self::Level1 => "Level1ChangeMessage",
            Self::Quotes => "QuoteChangeMessage",
            Self::Candles(_) => "TimeFrameCandleMessage",
        }
    }

    /// Returns the wire argument, if the kind carries one.
    #[must_use]
    pub fn arg(&self) -> Option<String> {
        match self {
            Self::Ticks => Some("Tick".to_string()),
            Self::OrderLog => Some("OrderLog".to_string()),
            Self::Transactions => Some("Transaction".to_string()),
            Self::Level1 | Self::Quotes => None,
            Self::Candles(tf) => Some(tf.as_str().to_string()),
        }
    }

    /// Returns the file stem used for date-partitioned storage.
    #[must_use]
    pub fn file_stem(&self) -> String {
        match self {
            Self::Ticks => "trades".to_string(),
            Self::OrderLog => "orderlog".to_string(),
            Self::Transactions => "transactions".to_string(),
            Self::Level1 => "level1".to_string(),
            Self::Quotes => "quotes".to_string(),
            Self::Candles(tf) => format!("candles_{tf}"),
        }
    }

    /// Converts to the raw wire descriptor.
    #[must_use]
    pub fn to_raw(&self) -> RawDataType {
        RawDataType::new(self.message_type(), self.arg())
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.arg() {
            Some(arg) => write!(f, "{}:{arg}", self.message_type()),
            None => f.write_str(self.message_type()),
        }
    }
}

/// A data type descriptor as it appears on the wire or in task settings:
/// a message type name plus an optional argument string.
///
/// Raw descriptors may use deprecated identifiers from earlier schema
/// versions; [`resolve_data_type`] maps them to the current [`DataType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataType {
    /// Message type name, e.g. `ExecutionMessage` or the legacy `Trade`.
    pub message_type: String,
    /// Kind-dependent argument, e.g. `Tick` or a timeframe.
    pub arg: Option<String>,
}

impl RawDataType {
    /// Creates a new raw descriptor.
    #[must_use]
    pub fn new(message_type: impl Into<String>, arg: Option<impl Into<String>>) -> Self {
        Self {
            message_type: message_type.into(),
            arg: arg.map(Into::into),
        }
    }

    /// Resolves this descriptor to the current schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier has no entry in the remap table.
    pub fn resolve(&self) -> Result<DataType, DataTypeParseError> {
        resolve_data_type(&self.message_type, self.arg.as_deref())
    }

    /// Returns the file stem used for date-partitioned storage.
    ///
    /// Resolvable descriptors share the stem of their current-schema
    /// equivalent, so a legacy `Trade` descriptor and a modern tick
    /// descriptor address the same stored file. Unresolvable descriptors
    /// fall back to a sanitized rendering of the raw name.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.resolve().map_or_else(
            |_| {
                let mut stem = self.message_type.to_lowercase();
                if let Some(arg) = &self.arg {
                    stem.push('_');
                    stem.push_str(&arg.to_lowercase().replace(':', "_"));
                }
                stem
            },
            |dt| dt.file_stem(),
        )
    }
}

impl From<DataType> for RawDataType {
    fn from(value: DataType) -> Self {
        value.to_raw()
    }
}

impl std::fmt::Display for RawDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}:{arg}", self.message_type),
            None => f.write_str(&self.message_type),
        }
    }
}

/// Maps a wire data type identifier to the current schema.
///
/// Current-schema names resolve directly. Deprecated identifiers from
/// earlier archive versions resolve through an explicit remap table:
///
/// | legacy identifier | current equivalent                 |
/// |-------------------|------------------------------------|
/// | `Trade`           | `ExecutionMessage` / `Tick`        |
/// | `OrderLogItem`    | `ExecutionMessage` / `OrderLog`    |
/// | `Order`, `MyTrade`| `ExecutionMessage` / `Transaction` |
/// | `MarketDepth`     | `QuoteChangeMessage`               |
/// | `TimeFrameCandle` | `TimeFrameCandleMessage` (same arg)|
///
/// # Errors
///
/// Returns an error when the identifier is unknown or its argument is
/// missing or malformed.
pub fn resolve_data_type(
    message_type: &str,
    arg: Option<&str>,
) -> Result<DataType, DataTypeParseError> {
    let unknown = || DataTypeParseError::Unknown {
        message_type: message_type.to_string(),
        arg: arg.map(str::to_string),
    };

    let candle_arg = |arg: Option<&str>| {
        let raw = arg.ok_or_else(|| DataTypeParseError::MissingArg {
            message_type: message_type.to_string(),
        })?;
        raw.parse::<Timeframe>()
            .map_err(|source| DataTypeParseError::BadTimeframe {
                message_type: message_type.to_string(),
                source,
            })
    };

    match message_type {
        "ExecutionMessage" => match arg {
            Some("Tick") => Ok(DataType::Ticks),
            Some("OrderLog") => Ok(DataType::OrderLog),
            Some("Transaction") => Ok(DataType::Transactions),
            _ => Err(unknown()),
        },
        "Level1ChangeMessage" => Ok(DataType::Level1),
        "QuoteChangeMessage" => Ok(DataType::Quotes),
        "TimeFrameCandleMessage" => Ok(DataType::Candles(candle_arg(arg)?)),

        // Legacy business-object identifiers from pre-message archives.
        "Trade" => Ok(DataType::Ticks),
        "OrderLogItem" => Ok(DataType::OrderLog),
        "Order" | "MyTrade" => Ok(DataType::Transactions),
        "Level1Change" => Ok(DataType::Level1),
        "MarketDepth" => Ok(DataType::Quotes),
        "TimeFrameCandle" => Ok(DataType::Candles(candle_arg(arg)?)),

        _ => Err(unknown()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_identifiers_resolve() {
        assert_eq!(
            resolve_data_type("ExecutionMessage", Some("Tick")).unwrap(),
            DataType::Ticks
        );
        assert_eq!(
            resolve_data_type("Level1ChangeMessage", None).unwrap(),
            DataType::Level1
        );
        assert_eq!(
            resolve_data_type("TimeFrameCandleMessage", Some("m5")).unwrap(),
            DataType::Candles(Timeframe::Minute5)
        );
    }

    #[test]
    fn test_legacy_identifiers_remap() {
        assert_eq!(resolve_data_type("Trade", None).unwrap(), DataType::Ticks);
        assert_eq!(
            resolve_data_type("OrderLogItem", None).unwrap(),
            DataType::OrderLog
        );
        assert_eq!(
            resolve_data_type("MarketDepth", None).unwrap(),
            DataType::Quotes
        );
        assert_eq!(
            resolve_data_type("TimeFrameCandle", Some("00:01:00")).unwrap(),
            DataType::Candles(Timeframe::Minute1)
        );
    }

    #[test]
    fn test_unknown_identifier_is_error() {
        assert!(resolve_data_type("NewsMessage2", None).is_err());
        assert!(resolve_data_type("ExecutionMessage", Some("Snapshot")).is_err());
    }

    #[test]
    fn test_candle_without_arg_is_error() {
        assert!(matches!(
            resolve_data_type("TimeFrameCandle", None),
            Err(DataTypeParseError::MissingArg { .. })
        ));
    }

    #[test]
    fn test_raw_roundtrip_through_wire_encoding() {
        let dt = DataType::Candles(Timeframe::Hour1);
        let raw = dt.to_raw();
        assert_eq!(raw.message_type, "TimeFrameCandleMessage");
        assert_eq!(raw.resolve().unwrap(), dt);
    }

    #[test]
    fn test_legacy_and_modern_share_file_stem() {
        let legacy = RawDataType::new("Trade", None::<String>);
        let modern = DataType::Ticks.to_raw();
        assert_eq!(legacy.file_stem(), "trades");
        assert_eq!(legacy.file_stem(), modern.file_stem());
    }

    #[test]
    fn test_unresolvable_file_stem_falls_back() {
        let raw = RawDataType::new("NewsMessage", None::<String>);
        assert_eq!(raw.file_stem(), "newsmessage");
    }
}
