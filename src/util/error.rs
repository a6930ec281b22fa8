// logcompact - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every failure is fatal to the run; callers report and exit non-zero.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all logcompact operations.
#[derive(Debug)]
pub enum LogCompactError {
    /// The input log file does not exist.
    InputNotFound { path: PathBuf },

    /// The input log file exists but could not be opened or read.
    InputRead { path: PathBuf, source: io::Error },

    /// A line or timestamp range argument is malformed.
    MalformedRange(RangeError),

    /// The split keyword list contains no usable keyword, or too many.
    InvalidKeywords { raw: String, reason: &'static str },

    /// An output file could not be created, written, or flushed.
    UnwritableOutput { path: PathBuf, source: io::Error },

    /// Configuration loading failed.
    Config(ConfigError),
}

impl fmt::Display for LogCompactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "Input file '{}' does not exist", path.display())
            }
            Self::InputRead { path, source } => {
                write!(f, "Cannot read input file '{}': {source}", path.display())
            }
            Self::MalformedRange(e) => write!(f, "Malformed range: {e}"),
            Self::InvalidKeywords { raw, reason } => {
                write!(f, "Invalid split keyword list '{raw}': {reason}")
            }
            Self::UnwritableOutput { path, source } => {
                write!(f, "Cannot write output file '{}': {source}", path.display())
            }
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogCompactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InputRead { source, .. } => Some(source),
            Self::MalformedRange(e) => Some(e),
            Self::UnwritableOutput { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Range errors
// ---------------------------------------------------------------------------

/// Errors produced while parsing a `start-end` range argument.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeError {
    /// The argument has no `-` between the two bounds.
    MissingSeparator { raw: String },

    /// A bound is not a number of the expected kind.
    InvalidBound { raw: String, bound: String },

    /// A timestamp bound is NaN or infinite.
    NonFinite { raw: String },

    /// Line numbers are 1-based; 0 is not a line.
    ZeroLine { raw: String },

    /// The start bound is greater than the end bound.
    Inverted { raw: String },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator { raw } => {
                write!(f, "'{raw}' must be in the form start-end")
            }
            Self::InvalidBound { raw, bound } => {
                write!(f, "'{raw}': bound '{bound}' is not a valid number")
            }
            Self::NonFinite { raw } => write!(f, "'{raw}': bounds must be finite"),
            Self::ZeroLine { raw } => {
                write!(f, "'{raw}': line numbers start at 1")
            }
            Self::Inverted { raw } => {
                write!(f, "'{raw}': start must not be greater than end")
            }
        }
    }
}

impl std::error::Error for RangeError {}

impl From<RangeError> for LogCompactError {
    fn from(e: RangeError) -> Self {
        Self::MalformedRange(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for LogCompactError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for logcompact results.
pub type Result<T> = std::result::Result<T, LogCompactError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_range_error_is_source_of_top_level() {
        let err: LogCompactError = RangeError::Inverted {
            raw: "5-2".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Malformed range: '5-2': start must not be greater than end"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unwritable_output_keeps_io_source() {
        let err = LogCompactError::UnwritableOutput {
            path: PathBuf::from("out/x.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("out/x.log"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("denied".to_string()));
    }
}
