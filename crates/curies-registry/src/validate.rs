//! Local identifier validation against record patterns.
//!
//! Validation is advisory and off by default; a [`Converter`](crate::Converter)
//! consults its validator only when one is installed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use curies_types::Record;
use regex::Regex;

use crate::types::{CurieError, CurieResult};

/// Predicate deciding whether a local identifier is acceptable for a record.
pub trait IdentifierValidator: fmt::Debug + Send + Sync {
    /// Checks a record before it is admitted to a registry.
    ///
    /// The default accepts every record.
    fn check_record(&self, _record: &Record) -> CurieResult<()> {
        Ok(())
    }

    /// Checks `local_id` against `record`.
    fn validate(&self, record: &Record, local_id: &str) -> CurieResult<()>;
}

/// Validates identifiers with each record's `pattern` regular expression.
///
/// Compiled expressions are cached by pattern text. Records without a
/// pattern accept every identifier.
///
/// # Example
///
/// ```
/// use curies_registry::{IdentifierValidator, RegexValidator};
/// use curies_types::Record;
///
/// let validator = RegexValidator::new();
/// let go = Record::new("go", "http://purl.obolibrary.org/obo/GO_").with_pattern("^\\d{7}$");
///
/// assert!(validator.validate(&go, "0032571").is_ok());
/// assert!(validator.validate(&go, "32571").is_err());
/// ```
#[derive(Debug, Default)]
pub struct RegexValidator {
    cache: RwLock<HashMap<String, Regex>>,
}

impl RegexValidator {
    /// Creates a validator with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of compiled patterns held in the cache.
    pub fn cached_patterns(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn compiled(&self, record: &Record, pattern: &str) -> CurieResult<Regex> {
        if let Some(regex) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern).map_err(|_| CurieError::InvalidPattern {
            prefix: record.prefix.clone(),
            pattern: pattern.to_string(),
        })?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }
}

impl IdentifierValidator for RegexValidator {
    fn check_record(&self, record: &Record) -> CurieResult<()> {
        if let Some(pattern) = &record.pattern {
            self.compiled(record, pattern)?;
        }
        Ok(())
    }

    fn validate(&self, record: &Record, local_id: &str) -> CurieResult<()> {
        let Some(pattern) = &record.pattern else {
            return Ok(());
        };
        if self.compiled(record, pattern)?.is_match(local_id) {
            Ok(())
        } else {
            Err(CurieError::PatternMismatch {
                prefix: record.prefix.clone(),
                id: local_id.to_string(),
                pattern: pattern.clone(),
            })
        }
    }
}
