//! Error types for zoi-checker

use std::time::Duration;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Failures of the CSV lookup path
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("Dataset has no data rows")]
    EmptyDataset,

    #[error("No data found for {0}")]
    NoMatchingRecord(String),

    #[error("Invalid measurement in column {slot}: {value:?}")]
    MalformedMeasurement { slot: String, value: String },

    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),
}

/// Failures of an external detector run
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Python executable not found. Set PYTHON_PATH or install Python.")]
    Unavailable,

    #[error("Detector failed: {0}")]
    ExecutionFailed(String),

    #[error("Failed to parse detector output: {0}")]
    OutputUnparseable(String),

    #[error("Detector did not finish within {0:?}")]
    Timeout(Duration),
}

/// Coarse classification of gateway failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    DependencyUnavailable,
    Execution,
    Parse,
    Storage,
    Timeout,
}

/// Everything an upload request can fail with
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Failed to store upload: {0}")]
    StorageWriteFailed(#[source] std::io::Error),

    #[error("Failed to read dataset: {0}")]
    DatasetUnreadable(#[source] std::io::Error),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::NoFileUploaded | GatewayError::InvalidFileType(_) => ErrorKind::Validation,
            GatewayError::StorageWriteFailed(_) | GatewayError::DatasetUnreadable(_) => {
                ErrorKind::Storage
            }
            GatewayError::Detector(DetectorError::Unavailable) => ErrorKind::DependencyUnavailable,
            GatewayError::Detector(DetectorError::ExecutionFailed(_)) => ErrorKind::Execution,
            GatewayError::Detector(DetectorError::OutputUnparseable(_)) => ErrorKind::Parse,
            GatewayError::Detector(DetectorError::Timeout(_)) => ErrorKind::Timeout,
            GatewayError::Lookup(LookupError::NoMatchingRecord(_)) => ErrorKind::NotFound,
            GatewayError::Lookup(_) => ErrorKind::Parse,
        }
    }

    /// HTTP status the error maps to
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            _ => 500,
        }
    }

    /// Machine-readable code for operator-correctable failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            GatewayError::Detector(DetectorError::Unavailable) => Some("py_not_found"),
            _ => None,
        }
    }

    /// Fixed message shown to the caller; details stay in the server log
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::NoFileUploaded => "No file uploaded.",
            GatewayError::InvalidFileType(_) => "Invalid file type. Only PNG/JPG allowed.",
            GatewayError::StorageWriteFailed(_) => "File saving failed.",
            GatewayError::DatasetUnreadable(_) => "Failed to read CSV.",
            GatewayError::Detector(DetectorError::Unavailable) => {
                "Python executable not found. Set PYTHON_PATH or install Python."
            }
            GatewayError::Detector(DetectorError::ExecutionFailed(_)) => "Image processing failed.",
            GatewayError::Detector(DetectorError::OutputUnparseable(_)) => "Failed to parse result.",
            GatewayError::Detector(DetectorError::Timeout(_)) => "Image processing timed out.",
            GatewayError::Lookup(LookupError::NoMatchingRecord(_)) => "No data found for this image.",
            GatewayError::Lookup(LookupError::EmptyDataset) => "CSV is empty.",
            GatewayError::Lookup(_) => "Failed to parse CSV.",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
