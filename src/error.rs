use thiserror::Error;

/// Errors surfaced by the study library
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run \"{0}\" has no recorded data")]
    NoData(String),

    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, StudyError>;
