//! Error types for lrustore

use std::fmt;

/// Result type alias for lrustore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store construction
///
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested capacity is below 1
    InvalidCapacity(i64),

    /// Capacity text is not an integer
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(n) => write!(f, "Invalid capacity: {} (must be at least 1)", n),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::Parse(err.to_string())
    }
}
