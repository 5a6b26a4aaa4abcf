//! Error types for bucketsweep

/// Result type alias using bucketsweep's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bucketsweep operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A selector's `matchExpression` is not a valid regular expression.
    ///
    /// `message` carries the regex engine's diagnostic unchanged.
    #[error("invalid match expression '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Any other malformed selector field (dates, timezones, empty keys)
    #[error("invalid selector field '{field}': {message}")]
    InvalidSelector { field: String, message: String },

    /// Policy document errors
    #[error("policy error: {0}")]
    Policy(String),

    /// Object listing errors
    #[error("listing error: {0}")]
    Listing(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid selector error
    pub fn invalid_selector(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new policy error
    pub fn policy(msg: impl Into<String>) -> Self {
        Self::Policy(msg.into())
    }

    /// Create a new listing error
    pub fn listing(msg: impl Into<String>) -> Self {
        Self::Listing(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from compiling a selector
    pub fn is_selector_error(&self) -> bool {
        matches!(self, Self::InvalidPattern { .. } | Self::InvalidSelector { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_display() {
        let err = Error::invalid_pattern("(?!)", "look-around is not supported");
        assert_eq!(
            err.to_string(),
            "invalid match expression '(?!)': look-around is not supported"
        );
        assert!(err.is_selector_error());
    }

    #[test]
    fn test_policy_error_is_not_selector_error() {
        let err = Error::policy("bad yaml");
        assert_eq!(err.to_string(), "policy error: bad yaml");
        assert!(!err.is_selector_error());
    }
}
