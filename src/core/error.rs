use thiserror::Error;

/// Failure kinds of the conversion and history layers.
///
/// The CLI collapses `NetworkFailure` and `InvalidResponse` into a single
/// "Conversion failed" message; the variants exist so callers and tests can
/// tell them apart.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid conversion request: {0}")]
    InvalidRequest(String),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Stored history is corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl Error {
    /// True for the failures reported to the user as "Conversion failed".
    pub fn is_conversion_failure(&self) -> bool {
        matches!(self, Error::NetworkFailure(_) | Error::InvalidResponse(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
