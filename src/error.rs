use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Unknown pollutant code: '{0}' (expected one of NO2, O3, PM10, SO2, PM25, CO)")]
    UnknownPollutantCode(String),

    #[error("No usable values for {column}: cannot estimate bounds from an empty distribution")]
    EmptyDistribution { column: String },

    #[error("Degenerate value range: pooled values have zero spread (lower = upper = {value})")]
    DegenerateRange { value: f64 },

    #[error("Normalized value {0} is outside [0, 1]")]
    NormalizedValueOutOfRange(f64),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    /// Errors that end a single pollutant query without saying anything about
    /// the input files themselves.
    pub fn is_query_failure(&self) -> bool {
        matches!(
            self,
            ProcessingError::UnknownPollutantCode(_)
                | ProcessingError::EmptyDistribution { .. }
                | ProcessingError::DegenerateRange { .. }
        )
    }
}
