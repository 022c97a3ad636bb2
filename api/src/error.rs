use thiserror::Error;

/// Failure of a remote call. Both variants are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with an error message.
    #[error("{0}")]
    Server(String),
}

impl ApiError {
    /// Message supplied by the server, if there is one worth showing as-is.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server(message) if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

/// A date range that cannot be queried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidFormat,
    #[error("Start date cannot be after end date")]
    StartAfterEnd,
    #[error("Date range too large (max 1 year)")]
    TooLarge,
}
