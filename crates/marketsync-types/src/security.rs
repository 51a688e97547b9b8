//! Security identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::SecurityIdParseError;

/// Identifier of a tradable instrument: an instrument code plus the board
/// (exchange venue) it trades on.
///
/// The canonical rendering is `CODE@BOARD`, e.g. `AAPL@NASDAQ`. Identifiers
/// are immutable values compared by equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecurityId {
    code: String,
    board: String,
}

impl SecurityId {
    /// Creates a new security identifier.
    #[must_use]
    pub fn new(code: impl Into<String>, board: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            board: board.into(),
        }
    }

    /// Returns the instrument code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the board (venue) code.
    #[must_use]
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Returns a rendering safe for use as a directory name.
    ///
    /// Characters that are invalid in file names on common platforms are
    /// replaced with underscores.
    #[must_use]
    pub fn folder_name(&self) -> String {
        self.to_string()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                other => other,
            })
            .collect()
    }
}

impl std::fmt::Display for SecurityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.code, self.board)
    }
}

impl FromStr for SecurityId {
    type Err = SecurityIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, board) = s
            .split_once('@')
            .ok_or_else(|| SecurityIdParseError::MissingBoard(s.to_string()))?;

        if code.is_empty() || board.is_empty() {
            return Err(SecurityIdParseError::Empty(s.to_string()));
        }

        Ok(Self::new(code, board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        let id = SecurityId::new("AAPL", "NASDAQ");
        assert_eq!(id.to_string(), "AAPL@NASDAQ");
        assert_eq!("AAPL@NASDAQ".parse::<SecurityId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_missing_board() {
        assert!("AAPL".parse::<SecurityId>().is_err());
        assert!("@NASDAQ".parse::<SecurityId>().is_err());
        assert!("AAPL@".parse::<SecurityId>().is_err());
    }

    #[test]
    fn test_folder_name_sanitizes() {
        let id = SecurityId::new("RI/Z5", "FORTS");
        assert_eq!(id.folder_name(), "RI_Z5@FORTS");
    }
}
