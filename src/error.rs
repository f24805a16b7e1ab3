use thiserror::Error;

/// Library errors using thiserror for structured error handling.
///
/// The match engine itself never fails: out-of-range input is clamped or
/// ignored. These errors cover the edges around it (loading configuration,
/// parsing operator input).

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument <{arg}> for '{command}'")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("Invalid team: {0} (expected 1 or 2)")]
    InvalidTeam(String),

    #[error("Invalid treasure type: {0} (expected stone, gold or diamond)")]
    InvalidTreasure(String),

    #[error("Invalid slot: {0} (expected 1, 2 or 3)")]
    InvalidSlot(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("No time preset #{0}")]
    UnknownPreset(usize),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = CommandParseError::InvalidSlot("4".to_string());
        assert_eq!(err.to_string(), "Invalid slot: 4 (expected 1, 2 or 3)");

        let err = CommandParseError::MissingArgument {
            command: "count",
            arg: "slot",
        };
        assert_eq!(err.to_string(), "Missing argument <slot> for 'count'");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/config.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/config.json"
        );
    }
}
