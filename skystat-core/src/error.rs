use thiserror::Error;

/// Crate-wide error type.
///
/// Each variant is one failure domain; the payload is the human-readable
/// message surfaced to the caller.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Invalid credential or broken on-disk configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed caller-supplied argument (empty city, non-finite number, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any failure while fetching or interpreting a provider response.
    #[error("weather data error: {0}")]
    WeatherData(String),

    /// Any failure while building, summarizing or persisting tabular data.
    #[error("analysis error: {0}")]
    Analysis(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;
