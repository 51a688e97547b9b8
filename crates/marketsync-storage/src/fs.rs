//! Filesystem storage drive.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use marketsync_types::{DateSet, RawDataType, SecurityId, StorageFormat};

use crate::{LocalStorage, StorageError};

/// Directory name format for one date partition.
const DATE_DIR_FORMAT: &str = "%Y_%m_%d";

/// Date-partitioned filesystem drive.
///
/// Layout: `<root>/<SECURITY@BOARD>/<yyyy_mm_dd>/<stem>.<ext>`, one file
/// per (security, data type, format, date) tuple. Saves go through a
/// temporary file in the target directory followed by an atomic rename,
/// so a cancelled or crashed writer never leaves a truncated page behind.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a drive rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the drive's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the canonical path of one stored page.
    #[must_use]
    pub fn page_path(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> PathBuf {
        self.root
            .join(security.folder_name())
            .join(date.format(DATE_DIR_FORMAT).to_string())
            .join(format!("{}.{}", data_type.file_stem(), format.extension()))
    }

    fn security_dir(&self, security: &SecurityId) -> PathBuf {
        self.root.join(security.folder_name())
    }
}

#[async_trait]
impl LocalStorage for FsStorage {
    async fn dates(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
    ) -> Result<DateSet, StorageError> {
        let dir = self.security_dir(security);
        let file_name = format!("{}.{}", data_type.file_stem(), format.extension());

        tokio::task::spawn_blocking(move || scan_dates(&dir, &file_name))
            .await
            .map_err(|_| StorageError::TaskAborted)?
    }

    async fn save(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
        body: &[u8],
    ) -> Result<(), StorageError> {
        let path = self.page_path(security, data_type, format, date);
        let body = body.to_vec();

        tokio::task::spawn_blocking(move || atomic_write(&path, &body))
            .await
            .map_err(|_| StorageError::TaskAborted)?
    }

    async fn load(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> Result<Option<Bytes>, StorageError> {
        let path = self.page_path(security, data_type, format, date);

        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(Bytes::from(body))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFile { path, source }),
        }
    }

    async fn delete(
        &self,
        security: &SecurityId,
        data_type: &RawDataType,
        format: StorageFormat,
        date: NaiveDate,
    ) -> Result<(), StorageError> {
        let path = self.page_path(security, data_type, format, date);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted page");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::DeleteFile { path, source }),
        }
    }
}

fn scan_dates(security_dir: &Path, file_name: &str) -> Result<DateSet, StorageError> {
    let mut dates = DateSet::new();

    let entries = match std::fs::read_dir(security_dir) {
        Ok(entries) => entries,
        // No directory yet means no stored dates.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(dates),
        Err(source) => {
            return Err(StorageError::ReadDir {
                path: security_dir.to_path_buf(),
                source,
            });
        }
    };

    for entry in entries {
        let entry = entry.map_err(|source| StorageError::ReadDir {
            path: security_dir.to_path_buf(),
            source,
        })?;

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let Ok(date) = NaiveDate::parse_from_str(name, DATE_DIR_FORMAT) else {
            continue;
        };

        if entry.path().join(file_name).is_file() {
            dates.insert(date);
        }
    }

    Ok(dates)
}

fn atomic_write(path: &Path, body: &[u8]) -> Result<(), StorageError> {
    let dir = path.parent().unwrap_or(Path::new("."));

    std::fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    // Temp file in the destination directory keeps the rename on one
    // filesystem, which is what makes it atomic.
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| StorageError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;

    tmp.write_all(body)
        .and_then(|()| tmp.flush())
        .map_err(|source| StorageError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;

    tmp.persist(path).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!(path = %path.display(), bytes = body.len(), "persisted page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageHeader;
    use marketsync_types::DataType;

    fn sec() -> SecurityId {
        SecurityId::new("ABC", "X")
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[tokio::test]
    async fn test_save_then_dates_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let ticks = DataType::Ticks.to_raw();

        let mut page = PageHeader::encode_binary(3);
        page.extend_from_slice(b"body");

        storage
            .save(&sec(), &ticks, StorageFormat::Binary, d(2), &page)
            .await
            .unwrap();
        storage
            .save(&sec(), &ticks, StorageFormat::Binary, d(4), &page)
            .await
            .unwrap();

        let dates = storage
            .dates(&sec(), &ticks, StorageFormat::Binary)
            .await
            .unwrap();
        assert_eq!(dates.iter().collect::<Vec<_>>(), vec![d(2), d(4)]);

        let body = storage
            .load(&sec(), &ticks, StorageFormat::Binary, d(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&body[..], &page[..]);
    }

    #[tokio::test]
    async fn test_dates_empty_when_nothing_stored() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        let dates = storage
            .dates(&sec(), &DataType::Level1.to_raw(), StorageFormat::Binary)
            .await
            .unwrap();
        assert!(dates.is_empty());
    }

    #[tokio::test]
    async fn test_dates_distinguish_format_and_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let ticks = DataType::Ticks.to_raw();

        storage
            .save(&sec(), &ticks, StorageFormat::Csv, d(2), b"1;a\n")
            .await
            .unwrap();

        let bin_dates = storage
            .dates(&sec(), &ticks, StorageFormat::Binary)
            .await
            .unwrap();
        assert!(bin_dates.is_empty());

        let quote_dates = storage
            .dates(&sec(), &DataType::Quotes.to_raw(), StorageFormat::Csv)
            .await
            .unwrap();
        assert!(quote_dates.is_empty());
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_debris() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let ticks = DataType::Ticks.to_raw();

        storage
            .save(&sec(), &ticks, StorageFormat::Binary, d(2), b"payload")
            .await
            .unwrap();

        let date_dir = storage
            .page_path(&sec(), &ticks, StorageFormat::Binary, d(2))
            .parent()
            .unwrap()
            .to_path_buf();
        let entries: Vec<_> = std::fs::read_dir(&date_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["trades.bin".to_string()]);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_page() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let ticks = DataType::Ticks.to_raw();

        storage
            .save(&sec(), &ticks, StorageFormat::Binary, d(2), b"old")
            .await
            .unwrap();
        storage
            .save(&sec(), &ticks, StorageFormat::Binary, d(2), b"new")
            .await
            .unwrap();

        let body = storage
            .load(&sec(), &ticks, StorageFormat::Binary, d(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&body[..], b"new");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let ticks = DataType::Ticks.to_raw();

        storage
            .save(&sec(), &ticks, StorageFormat::Binary, d(2), b"payload")
            .await
            .unwrap();
        storage
            .delete(&sec(), &ticks, StorageFormat::Binary, d(2))
            .await
            .unwrap();
        storage
            .delete(&sec(), &ticks, StorageFormat::Binary, d(2))
            .await
            .unwrap();

        assert!(
            storage
                .load(&sec(), &ticks, StorageFormat::Binary, d(2))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_legacy_descriptor_reads_modern_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        storage
            .save(
                &sec(),
                &DataType::Ticks.to_raw(),
                StorageFormat::Binary,
                d(2),
                b"payload",
            )
            .await
            .unwrap();

        let legacy = RawDataType::new("Trade", None::<String>);
        let dates = storage
            .dates(&sec(), &legacy, StorageFormat::Binary)
            .await
            .unwrap();
        assert!(dates.contains(d(2)));
    }
}
