//! Storage format of serialized market data pages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Serialization format of a stored page.
///
/// Every catalog entry and file payload carries the format it was produced
/// in, so a reader never has to guess the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// Compact binary pages with a fixed metadata header.
    #[default]
    Binary,
    /// Plain-text CSV pages, one record per line.
    Csv,
}

impl StorageFormat {
    /// Returns the file extension used for stored pages.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Csv => "csv",
        }
    }

    /// Returns the format as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageFormat {
    type Err = StorageFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" => Ok(Self::Binary),
            "csv" | "txt" => Ok(Self::Csv),
            _ => Err(StorageFormatParseError::Unknown(s.to_string())),
        }
    }
}

/// Error parsing a storage format from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageFormatParseError {
    /// The string does not name a supported format.
    #[error("Unknown storage format: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_extension() {
        assert_eq!("bin".parse::<StorageFormat>().unwrap(), StorageFormat::Binary);
        assert_eq!("csv".parse::<StorageFormat>().unwrap(), StorageFormat::Csv);
        assert_eq!(StorageFormat::Binary.extension(), "bin");
        assert!("parquet".parse::<StorageFormat>().is_err());
    }
}
