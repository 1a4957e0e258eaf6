use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractoError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("invalid fragment data: {0}")]
    FragmentParse(String),

    #[error("failed to load layout config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid layout config: {0}")]
    ConfigInvalid(String),

    #[error("cell ({row}, {column}) is outside the sheet")]
    CellOutOfRange { row: usize, column: usize },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("invalid table selection: {0}")]
    TableSelection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
