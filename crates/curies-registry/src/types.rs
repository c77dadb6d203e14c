//! Error and configuration types shared across the registry.

use curies_types::{well_known, RecordError};
use thiserror::Error;

/// Errors that can occur while building or querying a registry.
#[derive(Error, Debug)]
pub enum CurieError {
    /// The CURIE does not contain the delimiter.
    #[error("Invalid CURIE (no '{delimiter}' separator): {curie}")]
    InvalidCurie {
        /// The rejected input.
        curie: String,
        /// The delimiter that was searched for.
        delimiter: String,
    },

    /// No record owns this prefix, canonical or synonym.
    #[error("Prefix not found: {prefix}")]
    PrefixNotFound {
        /// The unknown prefix.
        prefix: String,
    },

    /// No registered URI prefix is a literal prefix of this URI.
    #[error("No URI prefix matches: {uri}")]
    UriNotFound {
        /// The unmatched URI.
        uri: String,
    },

    /// A prefix or URI prefix is already owned by a differently-mapped record.
    #[error("Duplicate record: '{value}' is already registered to prefix '{existing}'")]
    DuplicateRecord {
        /// The colliding prefix or URI prefix.
        value: String,
        /// Canonical prefix of the record that already owns `value`.
        existing: String,
    },

    /// The record failed structural validation.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] RecordError),

    /// A record's pattern is not a valid regular expression.
    #[error("Invalid pattern for prefix '{prefix}': {pattern}")]
    InvalidPattern {
        /// Prefix of the record carrying the pattern.
        prefix: String,
        /// The rejected pattern.
        pattern: String,
    },

    /// A local identifier does not match its record's pattern.
    #[error("Identifier '{id}' does not match pattern {pattern} of prefix '{prefix}'")]
    PatternMismatch {
        /// Canonical prefix of the record.
        prefix: String,
        /// The rejected local identifier.
        id: String,
        /// The record's pattern.
        pattern: String,
    },

    /// An element of a batch operation failed.
    #[error("Batch element {index} failed: {source}")]
    Batch {
        /// Position of the failing element in the input.
        index: usize,
        /// The element's error.
        #[source]
        source: Box<CurieError>,
    },

    /// Chaining was requested over an empty list of converters.
    #[error("Cannot chain an empty list of converters")]
    EmptyChain,

    /// I/O error reading a registry file.
    #[error("IO error reading registry: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tab-delimited parsing error.
    #[error("TSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Input is well-formed at the byte level but not in the expected shape.
    #[error("Invalid {format} document: {message}")]
    InvalidFormat {
        /// Name of the format being read.
        format: &'static str,
        /// What was wrong.
        message: String,
    },

    /// Invalid header - column count mismatch.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },
}

impl CurieError {
    /// Returns the innermost error, unwrapping batch reports.
    pub fn root(&self) -> &CurieError {
        match self {
            Self::Batch { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format,
            message: message.into(),
        }
    }
}

/// Result type for registry operations.
pub type CurieResult<T> = Result<T, CurieError>;

/// Configuration for a [`Converter`](crate::Converter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Separator between prefix and local identifier.
    pub delimiter: String,
    /// Whether local identifiers are checked against record patterns.
    pub validate_patterns: bool,
    /// Minimum batch length before batch operations fan out across threads.
    pub parallel_threshold: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            delimiter: well_known::DEFAULT_DELIMITER.to_string(),
            validate_patterns: false,
            parallel_threshold: 1_000,
        }
    }
}

impl ConverterConfig {
    /// Creates a config that checks identifiers against record patterns.
    pub fn validating() -> Self {
        Self {
            validate_patterns: true,
            ..Self::default()
        }
    }

    /// Creates a config using a custom CURIE delimiter.
    ///
    /// An empty delimiter falls back to `:`.
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        Self {
            delimiter: if delimiter.is_empty() {
                well_known::DEFAULT_DELIMITER.to_string()
            } else {
                delimiter
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_config_default() {
        let config = ConverterConfig::default();
        assert_eq!(config.delimiter, ":");
        assert!(!config.validate_patterns);
        assert_eq!(config.parallel_threshold, 1_000);
    }

    #[test]
    fn test_converter_config_presets() {
        assert!(ConverterConfig::validating().validate_patterns);
        assert_eq!(ConverterConfig::with_delimiter("_").delimiter, "_");
        assert_eq!(ConverterConfig::with_delimiter("").delimiter, ":");
    }

    #[test]
    fn test_batch_error_root() {
        let err = CurieError::Batch {
            index: 3,
            source: Box::new(CurieError::PrefixNotFound {
                prefix: "nope".to_string(),
            }),
        };
        assert!(matches!(err.root(), CurieError::PrefixNotFound { .. }));
        assert_eq!(err.to_string(), "Batch element 3 failed: Prefix not found: nope");
    }
}
