//! Error types for the repair library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all repair operations.
///
/// Only the fatal categories ([`Diagnosis`](RepairError::Diagnosis) and
/// [`Storage`](RepairError::Storage)) are expected to unwind to the flow
/// controller; soft-stage failures are absorbed at the point of occurrence
/// and recorded as absences in the data model.
#[derive(Error, Debug)]
pub enum RepairError {
    /// The diagnosis stage could not produce a usable analysis. Fatal to
    /// the pipeline: no document is created.
    #[error("Diagnosis failed: {reason}")]
    Diagnosis { reason: String },

    /// A document was assembled but could not be stored. Fatal, and
    /// deliberately distinct from a diagnosis failure.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// No document exists for the given ID.
    #[error("Repair document '{id}' not found")]
    DocumentNotFound { id: String },

    /// A provider capability failed at the transport level. Callers absorb
    /// this for soft capabilities and map it to `Diagnosis` for the hard one.
    #[error("Provider call '{capability}' failed: {message}")]
    Provider {
        capability: &'static str,
        message: String,
    },

    /// The live-capture device could not be acquired. Recoverable: the step
    /// machine reverts to normal mode.
    #[error("Capture device unavailable: {reason}")]
    Capture { reason: String },

    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl RepairError {
    /// Creates a diagnosis failure with the given reason.
    pub fn diagnosis(reason: impl fmt::Display) -> Self {
        Self::Diagnosis {
            reason: reason.to_string(),
        }
    }

    /// Creates a storage error without an underlying SQLite source.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage {
            message: message.to_string(),
            source: None,
        }
    }

    /// Creates a provider transport failure for the named capability.
    pub fn provider(capability: &'static str, message: impl fmt::Display) -> Self {
        Self::Provider {
            capability,
            message: message.to_string(),
        }
    }

    /// Returns true for the categories that abort the blueprint pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Diagnosis { .. } | Self::Storage { .. } | Self::DocumentNotFound { .. }
        )
    }
}

/// Specialized extension trait for storage-related Results.
pub trait StorageResultExt<T> {
    /// Map SQLite errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| RepairError::Storage {
            message: message.to_string(),
            source: Some(e),
        })
    }
}

/// Result type alias for repair operations
pub type Result<T> = std::result::Result<T, RepairError>;
