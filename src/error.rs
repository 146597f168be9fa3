//! Error types for termdown.
//!
//! Only startup problems (bad TIME values, conflicting options, unusable output
//! paths, broken config files) are surfaced as errors. Everything that goes wrong
//! once the timer is running is logged and swallowed by the component involved.

use std::path::PathBuf;

/// A time specification that is neither a duration nor a recognizable date/time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unable to parse TIME value '{input}'")]
pub struct ParseError {
    /// The text as given by the user
    pub input: String,
}

impl ParseError {
    pub fn new(input: impl Into<String>) -> Self {
        ParseError {
            input: input.into(),
        }
    }
}

/// Invalid or conflicting configuration detected before the timer starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("--exec-cmd and --voice are mutually exclusive")]
    VoiceAndExec,

    #[error("File already exists: {}", .0.display())]
    OutfileExists(PathBuf),

    #[error("Unable to write file: {}", .0.display())]
    OutfileNotWritable(PathBuf),

    #[error("Invalid {kind} format '{format}'")]
    InvalidFormat {
        /// Which option carried the format ("time" or "date")
        kind: &'static str,
        format: String,
    },

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level error returned by startup and by the mode loops.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Failed to set up logging: {0}")]
    Logging(#[from] log::SetLoggerError),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("soon");
        assert_eq!(err.to_string(), "Unable to parse TIME value 'soon'");
    }

    #[test]
    fn test_outfile_exists_display() {
        let err = ConfigError::OutfileExists(PathBuf::from("/tmp/left"));
        assert_eq!(err.to_string(), "File already exists: /tmp/left");
    }

    #[test]
    fn test_timer_error_wraps_parse_error_transparently() {
        let err: TimerError = ParseError::new("xyz").into();
        assert_eq!(err.to_string(), "Unable to parse TIME value 'xyz'");
    }
}
