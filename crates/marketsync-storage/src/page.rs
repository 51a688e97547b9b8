//! Page metadata headers.
//!
//! Every stored binary page starts with a fixed header carrying the record
//! count, so integrity checks never have to deserialize the payload. CSV
//! pages carry no explicit header; their record count is the number of data
//! rows.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use marketsync_types::StorageFormat;

use crate::PageError;

/// Magic bytes opening every binary page.
pub const PAGE_MAGIC: [u8; 4] = *b"MSPG";

/// Current binary page version.
pub const PAGE_VERSION: u8 = 1;

/// Length of the fixed binary header: magic + version + record count.
pub const BINARY_HEADER_LEN: usize = 4 + 1 + 8;

/// Parsed page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Page format version.
    pub version: u8,
    /// Number of records in the page body.
    pub record_count: u64,
}

impl PageHeader {
    /// Parses the metadata header of a serialized page.
    ///
    /// Only the header is inspected; the payload body is never touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is truncated, carries the wrong
    /// magic, declares an unknown version, or (for CSV) is not UTF-8.
    pub fn parse(format: StorageFormat, payload: &[u8]) -> Result<Self, PageError> {
        match format {
            StorageFormat::Binary => Self::parse_binary(payload),
            StorageFormat::Csv => Self::parse_csv(payload),
        }
    }

    fn parse_binary(payload: &[u8]) -> Result<Self, PageError> {
        if payload.len() < BINARY_HEADER_LEN {
            return Err(PageError::TooShort { len: payload.len() });
        }

        if payload[..4] != PAGE_MAGIC {
            return Err(PageError::BadMagic);
        }

        let mut cursor = Cursor::new(&payload[4..BINARY_HEADER_LEN]);
        let version = cursor.read_u8().map_err(|_| PageError::TooShort {
            len: payload.len(),
        })?;

        if version != PAGE_VERSION {
            return Err(PageError::UnsupportedVersion(version));
        }

        let record_count = cursor
            .read_u64::<LittleEndian>()
            .map_err(|_| PageError::TooShort {
                len: payload.len(),
            })?;

        Ok(Self {
            version,
            record_count,
        })
    }

    fn parse_csv(payload: &[u8]) -> Result<Self, PageError> {
        let text = std::str::from_utf8(payload).map_err(|_| PageError::NotUtf8)?;
        let record_count = text.lines().filter(|line| !line.trim().is_empty()).count() as u64;

        Ok(Self {
            version: PAGE_VERSION,
            record_count,
        })
    }

    /// Encodes a binary header for the given record count.
    ///
    /// Used by archive writers and test fixtures; readers only parse.
    #[must_use]
    pub fn encode_binary(record_count: u64) -> Vec<u8> {
        let mut header = Vec::with_capacity(BINARY_HEADER_LEN);
        header.extend_from_slice(&PAGE_MAGIC);
        header.push(PAGE_VERSION);
        // Vec<u8> writes cannot fail.
        header
            .write_u64::<LittleEndian>(record_count)
            .unwrap_or_default();
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_roundtrip() {
        let mut page = PageHeader::encode_binary(12345);
        page.extend_from_slice(b"opaque body bytes");

        let header = PageHeader::parse(StorageFormat::Binary, &page).unwrap();
        assert_eq!(header.record_count, 12345);
        assert_eq!(header.version, PAGE_VERSION);
    }

    #[test]
    fn test_binary_rejects_truncated() {
        let page = PageHeader::encode_binary(5);
        let err = PageHeader::parse(StorageFormat::Binary, &page[..6]).unwrap_err();
        assert!(matches!(err, PageError::TooShort { len: 6 }));
    }

    #[test]
    fn test_binary_rejects_bad_magic() {
        let mut page = PageHeader::encode_binary(5);
        page[0] = b'X';
        assert_eq!(
            PageHeader::parse(StorageFormat::Binary, &page).unwrap_err(),
            PageError::BadMagic
        );
    }

    #[test]
    fn test_binary_rejects_unknown_version() {
        let mut page = PageHeader::encode_binary(5);
        page[4] = 99;
        assert_eq!(
            PageHeader::parse(StorageFormat::Binary, &page).unwrap_err(),
            PageError::UnsupportedVersion(99)
        );
    }

    #[test]
    fn test_csv_counts_data_rows() {
        let page = b"1;100.5;10\n2;100.6;3\n\n3;100.4;7\n";
        let header = PageHeader::parse(StorageFormat::Csv, page).unwrap();
        assert_eq!(header.record_count, 3);
    }

    #[test]
    fn test_csv_rejects_non_utf8() {
        let page = [0xff, 0xfe, 0x00, 0x01];
        assert_eq!(
            PageHeader::parse(StorageFormat::Csv, &page).unwrap_err(),
            PageError::NotUtf8
        );
    }
}
