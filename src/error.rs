use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiteCastError {
    #[error("Insufficient forecast data: need at least {required} samples, got {available}")]
    InsufficientForecastData { required: usize, available: usize },

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Invalid hour index {hour} (forecast has {len} hours)")]
    InvalidHourIndex { hour: usize, len: usize },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, BiteCastError>;
