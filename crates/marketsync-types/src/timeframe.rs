//! Candle aggregation timeframe definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Candle aggregation timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 1-minute candles.
    #[serde(rename = "m1")]
    Minute1,
    /// 5-minute candles.
    #[serde(rename = "m5")]
    Minute5,
    /// 15-minute candles.
    #[serde(rename = "m15")]
    Minute15,
    /// 30-minute candles.
    #[serde(rename = "m30")]
    Minute30,
    /// 1-hour candles.
    #[serde(rename = "h1")]
    Hour1,
    /// 4-hour candles.
    #[serde(rename = "h4")]
    Hour4,
    /// Daily candles.
    #[serde(rename = "d1")]
    Day1,
}

impl Timeframe {
    /// Returns the candle duration in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Hour4 => 14400,
            Self::Day1 => 86400,
        }
    }

    /// Returns the timeframe as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "m1",
            Self::Minute5 => "m5",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Hour4 => "h4",
            Self::Day1 => "d1",
        }
    }

    /// Returns all supported timeframes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Hour4,
            Self::Day1,
        ]
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m1" | "1m" | "minute1" | "00:01:00" => Ok(Self::Minute1),
            "m5" | "5m" | "minute5" | "00:05:00" => Ok(Self::Minute5),
            "m15" | "15m" | "minute15" | "00:15:00" => Ok(Self::Minute15),
            "m30" | "30m" | "minute30" | "00:30:00" => Ok(Self::Minute30),
            "h1" | "1h" | "hour1" | "01:00:00" => Ok(Self::Hour1),
            "h4" | "4h" | "hour4" | "04:00:00" => Ok(Self::Hour4),
            "d1" | "1d" | "day1" | "1.00:00:00" => Ok(Self::Day1),
            _ => Err(TimeframeParseError::Unknown(s.to_string())),
        }
    }
}

/// Error parsing a timeframe from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeframeParseError {
    /// The string does not name a supported timeframe.
    #[error("Unknown timeframe: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("m1".parse::<Timeframe>().unwrap(), Timeframe::Minute1);
        assert_eq!("1h".parse::<Timeframe>().unwrap(), Timeframe::Hour1);
        // legacy TimeSpan renderings used by old archives
        assert_eq!("00:05:00".parse::<Timeframe>().unwrap(), Timeframe::Minute5);
        assert_eq!("1.00:00:00".parse::<Timeframe>().unwrap(), Timeframe::Day1);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("m7".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_seconds() {
        assert_eq!(Timeframe::Minute5.seconds(), 300);
        assert_eq!(Timeframe::Day1.seconds(), 86400);
    }
}
