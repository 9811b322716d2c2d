//! Error types for the sheetpeek library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheetpeek operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening and previewing a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// The path does not resolve to an existing file.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a spreadsheet container we can read.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A workbook part or sheet could not be decoded.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// No sheet with the requested name exists in the workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Error while producing output.
    #[error("Render error: {0}")]
    Render(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    UnsupportedFormat,
    CorruptData,
    Other,
}

impl Error {
    /// Classify this error.
    ///
    /// Unreadable paths count as [`ErrorKind::FileNotFound`] alongside
    /// missing ones.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound(_) => ErrorKind::FileNotFound,
            Error::Io(e) => match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    ErrorKind::FileNotFound
                }
                io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                    ErrorKind::CorruptData
                }
                _ => ErrorKind::Other,
            },
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::CorruptData(_) => ErrorKind::CorruptData,
            Error::SheetNotFound(_) | Error::Render(_) => ErrorKind::Other,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::CorruptData(format!("ZIP archive: {}", other)),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::CorruptData(format!("XML: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
