use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Failures that abort a run, plus the transport errors a single row can hit.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Board '{0}' not found.")]
    BoardNotFound(String),

    #[error("List '{0}' not found.")]
    ListNotFound(String),

    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no .{extension} file found in {}", folder.display())]
    NoSpreadsheet { folder: PathBuf, extension: String },

    /// More than one candidate workbook; the operator has to pick one.
    #[error("found {} .{extension} files in input folder, expected exactly one: {}", candidates.len(), list_paths(candidates))]
    AmbiguousSpreadsheet {
        extension: String,
        candidates: Vec<PathBuf>,
    },

    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("expected column '{0}' is missing from the header row")]
    MissingColumn(String),

    #[error("invalid number '{value}' in column {column} at sheet row {row}")]
    InvalidNumber {
        row: u32,
        column: String,
        value: String,
    },

    #[error("Excel read error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Trello API returned {status}: {body}")]
    Api { status: u16, body: String },
}

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
