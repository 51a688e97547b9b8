//! Protocol message definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use marketsync_types::{DateSet, RawDataType, SecurityId, StorageFormat};

use crate::TransactionId;

/// Catalog request: which dates exist for (security, data type, format)?
///
/// Omitting the data type asks for entries covering every data type stored
/// for the security. Omitting the format lets the server answer in its
/// stored/default format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDataQuery {
    /// The security the catalog is requested for.
    pub security: SecurityId,
    /// Optional data type filter.
    pub data_type: Option<RawDataType>,
    /// Optional storage format filter.
    pub format: Option<StorageFormat>,
    /// Correlation id; responses echo it as `original_transaction_id`.
    pub transaction_id: TransactionId,
}

/// Catalog response: the dates stored remotely for one
/// (security, data type, format) triple.
///
/// A large catalog may be split across several correlated entries; the
/// requester merges their date sets. Absence of the security or data type
/// is an empty entry list, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDataCatalogEntry {
    /// The security the entry describes.
    pub security: SecurityId,
    /// The data type the entry describes.
    pub data_type: RawDataType,
    /// Dates for which a stored page exists, ascending and unique.
    pub dates: DateSet,
    /// The format the pages were produced in.
    pub format: StorageFormat,
    /// The id of the originating [`AvailableDataQuery`].
    pub original_transaction_id: TransactionId,
}

/// Operation carried by a command envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Read the addressed data.
    Get,
    /// Create or replace the addressed data.
    Update,
    /// Delete the addressed data.
    Remove,
}

/// Addressing scope of a command envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandScope {
    /// Date-partitioned market data files.
    File,
    /// The security catalog itself.
    Security,
}

/// File transfer request envelope.
///
/// A read addresses a single date via the range `[date, date + 1 day)`;
/// `Update` carries the page to store in `body`; `Remove` may span a wider
/// range for batch deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTransferCommand {
    /// The operation to perform.
    pub command: CommandType,
    /// Always [`CommandScope::File`] for file transfer.
    pub scope: CommandScope,
    /// The security the addressed pages belong to.
    pub security: SecurityId,
    /// The data type of the addressed pages.
    pub data_type: RawDataType,
    /// Range start (inclusive).
    pub from: NaiveDate,
    /// Range end (exclusive).
    pub to: NaiveDate,
    /// The storage format of the addressed pages.
    pub format: StorageFormat,
    /// Page payload for uploads; absent for reads and deletes.
    pub body: Option<Vec<u8>>,
    /// Correlation id.
    pub transaction_id: TransactionId,
}

impl FileTransferCommand {
    /// Builds a read command for the page of a single date.
    #[must_use]
    pub fn get(
        security: SecurityId,
        data_type: RawDataType,
        format: StorageFormat,
        date: NaiveDate,
        transaction_id: TransactionId,
    ) -> Self {
        Self {
            command: CommandType::Get,
            scope: CommandScope::File,
            security,
            data_type,
            from: date,
            to: next_day(date),
            format,
            body: None,
            transaction_id,
        }
    }

    /// Builds an upload command storing `body` as the page of a single date.
    #[must_use]
    pub fn update(
        security: SecurityId,
        data_type: RawDataType,
        format: StorageFormat,
        date: NaiveDate,
        body: Vec<u8>,
        transaction_id: TransactionId,
    ) -> Self {
        Self {
            command: CommandType::Update,
            scope: CommandScope::File,
            security,
            data_type,
            from: date,
            to: next_day(date),
            format,
            body: Some(body),
            transaction_id,
        }
    }
}

/// File transfer response: the verbatim serialized page for one date.
///
/// A zero-length body is the defined sentinel meaning "no data exists for
/// this date" and must be handled identically to a successful empty fetch,
/// never as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTransferResult {
    /// The security the page belongs to.
    pub security: SecurityId,
    /// The data type of the page.
    pub data_type: RawDataType,
    /// The single date the page covers.
    pub date: NaiveDate,
    /// The format the page was produced in.
    pub format: StorageFormat,
    /// The serialized page, including its metadata header. Empty = sentinel.
    pub body: Vec<u8>,
    /// The id of the originating [`FileTransferCommand`].
    pub original_transaction_id: TransactionId,
}

impl FileTransferResult {
    /// Returns true if the body is the "no data for this date" sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.body.is_empty()
    }
}

/// Generic administrative command envelope.
///
/// Shares the request/response correlation discipline of
/// [`FileTransferCommand`] for operations that are not date-file reads,
/// e.g. remove-by-range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopedCommand {
    /// The operation to perform.
    pub command: CommandType,
    /// The addressing scope.
    pub scope: CommandScope,
    /// The security the command addresses, if scoped to one.
    pub security: Option<SecurityId>,
    /// The data type the command addresses, if any.
    pub data_type: Option<RawDataType>,
    /// The storage format the command addresses, if any.
    pub format: Option<StorageFormat>,
    /// Range start (inclusive), if the command addresses a range.
    pub from: Option<NaiveDate>,
    /// Range end (exclusive), if the command addresses a range.
    pub to: Option<NaiveDate>,
    /// Opaque payload, if the operation carries one.
    pub body: Option<Vec<u8>>,
    /// Correlation id.
    pub transaction_id: TransactionId,
}

impl ScopedCommand {
    /// Builds a remove-by-range command for date-partitioned files.
    #[must_use]
    pub fn remove_files(
        security: SecurityId,
        data_type: RawDataType,
        format: StorageFormat,
        from: NaiveDate,
        to: NaiveDate,
        transaction_id: TransactionId,
    ) -> Self {
        Self {
            command: CommandType::Remove,
            scope: CommandScope::File,
            security: Some(security),
            data_type: Some(data_type),
            format: Some(format),
            from: Some(from),
            to: Some(to),
            body: None,
            transaction_id,
        }
    }
}

/// Criteria for security catalog discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCriteria {
    /// Case-insensitive substring the instrument code must contain.
    pub code_like: Option<String>,
    /// Exact board code the instrument must trade on.
    pub board: Option<String>,
}

impl SecurityCriteria {
    /// Returns true if the given security matches the criteria.
    #[must_use]
    pub fn matches(&self, security: &SecurityId) -> bool {
        if let Some(code_like) = &self.code_like
            && !security
                .code()
                .to_lowercase()
                .contains(&code_like.to_lowercase())
        {
            return false;
        }

        if let Some(board) = &self.board
            && security.board() != board
        {
            return false;
        }

        true
    }
}

/// Security catalog discovery request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityLookup {
    /// Filter criteria; empty criteria match every security.
    pub criteria: SecurityCriteria,
    /// Correlation id.
    pub transaction_id: TransactionId,
}

/// Security catalog discovery response, one per matching security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityInfo {
    /// A security known to the remote archive.
    pub security: SecurityId,
    /// The id of the originating [`SecurityLookup`].
    pub original_transaction_id: TransactionId,
}

fn next_day(date: NaiveDate) -> NaiveDate {
    // NaiveDate::MAX is not a meaningful partition date; saturate quietly.
    date.succ_opt().unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketsync_types::DataType;

    fn sec() -> SecurityId {
        SecurityId::new("ABC", "X")
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_get_command_addresses_one_day() {
        let cmd = FileTransferCommand::get(
            sec(),
            DataType::Ticks.to_raw(),
            StorageFormat::Binary,
            date(2),
            7,
        );
        assert_eq!(cmd.command, CommandType::Get);
        assert_eq!(cmd.scope, CommandScope::File);
        assert_eq!(cmd.from, date(2));
        assert_eq!(cmd.to, date(3));
        assert!(cmd.body.is_none());
    }

    #[test]
    fn test_sentinel_detection() {
        let result = FileTransferResult {
            security: sec(),
            data_type: DataType::Level1.to_raw(),
            date: date(2),
            format: StorageFormat::Binary,
            body: Vec::new(),
            original_transaction_id: 7,
        };
        assert!(result.is_sentinel());
    }

    #[test]
    fn test_criteria_matching() {
        let criteria = SecurityCriteria {
            code_like: Some("ab".to_string()),
            board: Some("X".to_string()),
        };
        assert!(criteria.matches(&sec()));
        assert!(!criteria.matches(&SecurityId::new("ABC", "Y")));
        assert!(!criteria.matches(&SecurityId::new("ZZZ", "X")));
        assert!(SecurityCriteria::default().matches(&sec()));
    }

    #[test]
    fn test_catalog_entry_json_shape() {
        let entry = AvailableDataCatalogEntry {
            security: sec(),
            data_type: DataType::Ticks.to_raw(),
            dates: [date(1), date(2)].into_iter().collect(),
            format: StorageFormat::Csv,
            original_transaction_id: 42,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["originalTransactionId"], 42);
        assert_eq!(json["format"], "csv");
        assert_eq!(json["dataType"]["messageType"], "ExecutionMessage");

        let back: AvailableDataCatalogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
