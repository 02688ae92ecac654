//! Error types for the flashcard core

use thiserror::Error;

/// Result type alias using the crate's error type
pub type Result<T> = std::result::Result<T, FlashcardError>;

/// All errors produced outside the (total) similarity scorer
#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] calamine::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Invalid thresholds: exact={exact}, close={close} (need 0 <= close <= exact <= 1)")]
    InvalidThresholds { exact: f64, close: f64 },

    #[error("No cards available for '{0}'")]
    EmptyDeck(String),
}

#[cfg(feature = "python")]
impl From<FlashcardError> for pyo3::PyErr {
    fn from(err: FlashcardError) -> Self {
        pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
    }
}
