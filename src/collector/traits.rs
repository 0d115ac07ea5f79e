//! Adapter contract between metric views and the database.
//!
//! The `DataSource` trait lets a view collect from the real server or from a
//! scripted mock in tests.

use std::fmt;

/// MySQL error raised when `show_compatibility_56` disables
/// `INFORMATION_SCHEMA.GLOBAL_VARIABLES` / `GLOBAL_STATUS`.
pub const ER_FEATURE_DISABLED_SHOW_COMPATIBILITY_56: u16 = 3167;

/// MySQL error raised when the I_S table no longer exists (8.0+).
pub const ER_UNKNOWN_TABLE: u16 = 1109;

/// Error type for data collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// Could not connect, or the connection was lost.
    Connection(String),
    /// Query failed on the server.
    Query { code: u16, message: String },
    /// A known schema incompatibility that an alternate query source may avoid.
    Incompatible { code: u16, message: String },
    /// A returned value could not be converted.
    Decode(String),
}

impl CollectError {
    /// Classifies a server error code.
    pub fn from_server(code: u16, message: String) -> Self {
        match code {
            ER_FEATURE_DISABLED_SHOW_COMPATIBILITY_56 | ER_UNKNOWN_TABLE => {
                CollectError::Incompatible { code, message }
            }
            _ => CollectError::Query { code, message },
        }
    }

    /// True if retrying against the fallback query source may succeed.
    pub fn is_fallback_candidate(&self) -> bool {
        matches!(self, CollectError::Incompatible { .. })
    }
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::Connection(msg) => write!(f, "MySQL connection error: {}", msg),
            CollectError::Query { code, message }
            | CollectError::Incompatible { code, message } => {
                write!(f, "MySQL error {}: {}", code, message)
            }
            CollectError::Decode(msg) => write!(f, "MySQL decode error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {}

/// Fetches one domain's rows in a single round trip.
pub trait DataSource<R> {
    /// Returns every row currently reported by the server for this domain.
    fn fetch(&mut self) -> Result<Vec<R>, CollectError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_codes_are_fallback_candidates() {
        assert!(CollectError::from_server(3167, "disabled".into()).is_fallback_candidate());
        assert!(CollectError::from_server(1109, "unknown table".into()).is_fallback_candidate());
    }

    #[test]
    fn other_errors_are_fatal() {
        assert!(!CollectError::from_server(1146, "no such table".into()).is_fallback_candidate());
        assert!(!CollectError::Connection("refused".into()).is_fallback_candidate());
    }

    #[test]
    fn display_includes_code() {
        let e = CollectError::from_server(1045, "Access denied".into());
        assert_eq!(e.to_string(), "MySQL error 1045: Access denied");
    }
}
