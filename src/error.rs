use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagosError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Pago not found: {0}")]
    NotFound(String),
    #[error("Remote endpoint unavailable: {0}")]
    Unavailable(String),
    #[error("Action not permitted for role {role}: {action}")]
    Forbidden { role: String, action: &'static str },
    #[error("Form is read-only")]
    ReadOnly,
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, PagosError>;
