use thiserror::Error;

/// All errors produced by the event-trends crates.
#[derive(Error, Debug)]
pub enum TrendsError {
    /// A date string was not exactly eight digits forming a real calendar date.
    #[error("Invalid date format: {0:?} (expected YYYYMMDD)")]
    InvalidDateFormat(String),

    /// An event count column could not be read as a non-negative integer.
    #[error("Invalid event count: {0:?}")]
    InvalidCount(String),

    /// Summing event counts went past `u64::MAX`.
    #[error("Event count overflow: {0}")]
    CountOverflow(String),

    /// An analytics row did not have the `[date, action, count]` shape.
    #[error("Malformed analytics row: {0}")]
    MalformedRow(String),

    /// The HTTP request to the analytics endpoint failed before a response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The analytics endpoint answered with a non-success status.
    #[error("Analytics API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the event-trends crates.
pub type Result<T> = std::result::Result<T, TrendsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_date() {
        let err = TrendsError::InvalidDateFormat("2023-01-01".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid date format: \"2023-01-01\" (expected YYYYMMDD)"
        );
    }

    #[test]
    fn test_error_display_invalid_count() {
        let err = TrendsError::InvalidCount("many".to_string());
        assert_eq!(err.to_string(), "Invalid event count: \"many\"");
    }

    #[test]
    fn test_error_display_malformed_row() {
        let err = TrendsError::MalformedRow("expected 3 columns, got 2".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed analytics row: expected 3 columns, got 2"
        );
    }

    #[test]
    fn test_error_display_api() {
        let err = TrendsError::Api {
            status: 401,
            message: "Invalid Credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Analytics API returned 401: Invalid Credentials");
    }

    #[test]
    fn test_error_display_config() {
        let err = TrendsError::Config("missing view id".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing view id");
    }

    #[test]
    fn test_error_display_count_overflow() {
        let err = TrendsError::CountOverflow("week 2023-1, action \"click\"".to_string());
        assert_eq!(
            err.to_string(),
            "Event count overflow: week 2023-1, action \"click\""
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TrendsError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: TrendsError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
