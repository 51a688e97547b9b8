//! Error types for local storage.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the local storage drive.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to scan a directory.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be scanned.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a page file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a page file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a page file.
    #[error("Failed to delete file '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A background storage task was cancelled before completing.
    #[error("Storage task aborted")]
    TaskAborted,

    /// The page metadata header could not be parsed.
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Errors parsing a page metadata header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The payload is shorter than the fixed header.
    #[error("Page too short for header: {len} bytes")]
    TooShort {
        /// Observed payload length.
        len: usize,
    },

    /// The payload does not start with the page magic.
    #[error("Bad page magic")]
    BadMagic,

    /// The header declares a version this reader does not understand.
    #[error("Unsupported page version: {0}")]
    UnsupportedVersion(u8),

    /// A CSV page is not valid UTF-8.
    #[error("CSV page is not valid UTF-8")]
    NotUtf8,
}
