use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the conversion pipeline.
///
/// Malformed sub-fields (URL, date, tags) are not represented here: they
/// degrade to empty values inside the normalizers and never fail a record.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input file '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Error reading CSV file {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Per-record failure; the batch driver counts it and moves on.
    #[error("Failed to write {}: {source}", path.display())]
    WriteDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Underlying cause of an unreadable input table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ConvertError {
    /// Whether this error stops the whole batch rather than one record.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ConvertError::WriteDocument { .. })
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
