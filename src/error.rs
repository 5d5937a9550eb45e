use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The platform CSPRNG could not produce bytes. There is no fallback.
    #[error("secure random source unavailable: {0}")]
    RandomnessUnavailable(#[from] rand::Error),
    /// An environment capability (drawing surface, audio) is missing.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
