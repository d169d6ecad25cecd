//! Error types for errormine
//!
//! Construction-time failures (a bad hash automaton, an unreadable corpus)
//! are fatal and propagate to the caller; everything else is handled
//! internally by the mining core.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MineError>;

/// Main error type for errormine
#[derive(Error, Debug)]
pub enum MineError {
    /// The loaded file does not describe a valid perfect hash automaton
    #[error("Invalid hash automaton '{path}': {message}")]
    InvalidAutomaton { path: String, message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// I/O failure while reading a corpus or automaton
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl MineError {
    /// Create an invalid automaton error
    pub fn invalid_automaton(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAutomaton {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for MineError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MineError::invalid_automaton("words.vocab", "vocabulary is not sorted");
        assert!(err.to_string().contains("words.vocab"));
        assert!(err.to_string().contains("not sorted"));

        let err = MineError::invalid_config("n must be >= 1");
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
