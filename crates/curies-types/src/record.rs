//! Prefix registry record type.
//!
//! This module provides the `Record` struct associating a canonical prefix
//! with a canonical URI prefix, plus synonyms for both.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Errors raised when a record fails structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The canonical prefix is empty.
    EmptyPrefix,
    /// The canonical URI prefix is empty.
    EmptyUriPrefix {
        /// Prefix of the offending record.
        prefix: String,
    },
    /// A prefix or URI prefix synonym is empty.
    EmptySynonym {
        /// Prefix of the offending record.
        prefix: String,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrefix => write!(f, "record prefix must not be empty"),
            Self::EmptyUriPrefix { prefix } => {
                write!(f, "record '{}' has an empty URI prefix", prefix)
            }
            Self::EmptySynonym { prefix } => {
                write!(f, "record '{}' has an empty synonym", prefix)
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// A prefix / URI prefix association with synonym sets.
///
/// Two records are equal when their canonical `prefix` and `uri_prefix`
/// match; synonyms and pattern are not part of a record's identity.
///
/// # Examples
///
/// ```
/// use curies_types::Record;
///
/// let a = Record::new("doid", "http://purl.obolibrary.org/obo/DOID_");
/// let b = Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")
///     .with_prefix_synonyms(["DOID"]);
///
/// assert_eq!(a, b);
/// assert!(b.has_prefix("DOID"));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    /// Canonical short name, e.g. `doid`.
    pub prefix: String,
    /// Canonical URI prefix, e.g. `http://purl.obolibrary.org/obo/DOID_`.
    pub uri_prefix: String,
    /// Alternate short names resolving to this record.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeSet::is_empty")
    )]
    pub prefix_synonyms: BTreeSet<String>,
    /// Alternate URI prefixes resolving to this record.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeSet::is_empty")
    )]
    pub uri_prefix_synonyms: BTreeSet<String>,
    /// Regular expression local identifiers are expected to match.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub pattern: Option<String>,
}

impl Record {
    /// Creates a record without synonyms or pattern.
    ///
    /// No validation is performed; see [`Record::try_new`].
    pub fn new(prefix: impl Into<String>, uri_prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri_prefix: uri_prefix.into(),
            prefix_synonyms: BTreeSet::new(),
            uri_prefix_synonyms: BTreeSet::new(),
            pattern: None,
        }
    }

    /// Creates a record, rejecting an empty prefix or URI prefix.
    pub fn try_new(
        prefix: impl Into<String>,
        uri_prefix: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let record = Self::new(prefix, uri_prefix);
        record.validate()?;
        Ok(record)
    }

    /// Adds prefix synonyms.
    pub fn with_prefix_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefix_synonyms
            .extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Adds URI prefix synonyms.
    pub fn with_uri_prefix_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uri_prefix_synonyms
            .extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Sets the local identifier pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Checks that the canonical prefix, URI prefix and every synonym are non-empty.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.prefix.is_empty() {
            return Err(RecordError::EmptyPrefix);
        }
        if self.uri_prefix.is_empty() {
            return Err(RecordError::EmptyUriPrefix {
                prefix: self.prefix.clone(),
            });
        }
        let has_empty_synonym = self
            .prefix_synonyms
            .iter()
            .chain(&self.uri_prefix_synonyms)
            .any(String::is_empty);
        if has_empty_synonym {
            return Err(RecordError::EmptySynonym {
                prefix: self.prefix.clone(),
            });
        }
        Ok(())
    }

    /// Returns the canonical prefix followed by its synonyms.
    ///
    /// A synonym equal to the canonical prefix is yielded only once.
    pub fn all_prefixes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.prefix.as_str()).chain(
            self.prefix_synonyms
                .iter()
                .map(String::as_str)
                .filter(move |s| *s != self.prefix),
        )
    }

    /// Returns the canonical URI prefix followed by its synonyms.
    ///
    /// A synonym equal to the canonical URI prefix is yielded only once.
    pub fn all_uri_prefixes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.uri_prefix.as_str()).chain(
            self.uri_prefix_synonyms
                .iter()
                .map(String::as_str)
                .filter(move |s| *s != self.uri_prefix),
        )
    }

    /// Returns true if `prefix` is the canonical prefix or one of its synonyms.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefix == prefix || self.prefix_synonyms.contains(prefix)
    }

    /// Returns true if `uri_prefix` is the canonical URI prefix or one of its synonyms.
    pub fn has_uri_prefix(&self, uri_prefix: &str) -> bool {
        self.uri_prefix == uri_prefix || self.uri_prefix_synonyms.contains(uri_prefix)
    }

    /// Returns true if both records map the same canonical prefix to the
    /// same canonical URI prefix.
    pub fn same_mapping(&self, other: &Record) -> bool {
        self.prefix == other.prefix && self.uri_prefix == other.uri_prefix
    }

    /// Structural view of the record as field name / value pairs.
    ///
    /// The order is fixed: `prefix`, `uri_prefix`, `prefix_synonyms`,
    /// `uri_prefix_synonyms`, `pattern`.
    pub fn fields(&self) -> [(&'static str, FieldValue<'_>); 5] {
        [
            ("prefix", FieldValue::Text(&self.prefix)),
            ("uri_prefix", FieldValue::Text(&self.uri_prefix)),
            ("prefix_synonyms", FieldValue::Set(&self.prefix_synonyms)),
            ("uri_prefix_synonyms", FieldValue::Set(&self.uri_prefix_synonyms)),
            (
                "pattern",
                self.pattern
                    .as_deref()
                    .map_or(FieldValue::Absent, FieldValue::Text),
            ),
        ]
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_mapping(other)
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.uri_prefix.hash(state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.prefix, self.uri_prefix)?;
        if !self.prefix_synonyms.is_empty() {
            let synonyms: Vec<&str> = self.prefix_synonyms.iter().map(String::as_str).collect();
            write!(f, " (prefix synonyms: {})", synonyms.join(", "))?;
        }
        if !self.uri_prefix_synonyms.is_empty() {
            let synonyms: Vec<&str> = self
                .uri_prefix_synonyms
                .iter()
                .map(String::as_str)
                .collect();
            write!(f, " (URI prefix synonyms: {})", synonyms.join(", "))?;
        }
        Ok(())
    }
}

/// A single field value in a record's structural view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A string field.
    Text(&'a str),
    /// A synonym set.
    Set(&'a BTreeSet<String>),
    /// An optional field that is not set.
    Absent,
}

impl FieldValue<'_> {
    /// Renders the value as a single string, joining sets with `separator`.
    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::Text(s) => (*s).to_string(),
            Self::Set(set) => set
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(separator),
            Self::Absent => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert_eq!(
            Record::try_new("", "http://x/").unwrap_err(),
            RecordError::EmptyPrefix
        );
        assert_eq!(
            Record::try_new("x", "").unwrap_err(),
            RecordError::EmptyUriPrefix {
                prefix: "x".to_string()
            }
        );
        assert!(Record::try_new("x", "http://x/").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_synonym() {
        let record = Record::new("x", "http://x/").with_uri_prefix_synonyms([""]);
        assert_eq!(
            record.validate().unwrap_err(),
            RecordError::EmptySynonym {
                prefix: "x".to_string()
            }
        );
    }

    #[test]
    fn test_equality_ignores_synonyms() {
        let plain = Record::new("go", "http://purl.obolibrary.org/obo/GO_");
        let rich = plain.clone().with_prefix_synonyms(["gomf", "GO"]);
        let other = Record::new("go", "https://identifiers.org/GO:");

        assert_eq!(plain, rich);
        assert_ne!(plain, other);
    }

    #[test]
    fn test_all_prefixes_skips_self_synonym() {
        let record = Record::new("go", "http://purl.obolibrary.org/obo/GO_")
            .with_prefix_synonyms(["go", "gomf"])
            .with_uri_prefix_synonyms(["http://purl.obolibrary.org/obo/GO_"]);

        let prefixes: Vec<&str> = record.all_prefixes().collect();
        assert_eq!(prefixes, vec!["go", "gomf"]);

        let uri_prefixes: Vec<&str> = record.all_uri_prefixes().collect();
        assert_eq!(uri_prefixes, vec!["http://purl.obolibrary.org/obo/GO_"]);
    }

    #[test]
    fn test_fields_view() {
        let record = Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")
            .with_prefix_synonyms(["DOID", "do"]);
        let fields = record.fields();

        assert_eq!(fields[0], ("prefix", FieldValue::Text("doid")));
        assert_eq!(fields[2].1.join("|"), "DOID|do");
        assert_eq!(fields[4], ("pattern", FieldValue::Absent));
        assert_eq!(fields[4].1.join("|"), "");
    }

    #[test]
    fn test_display() {
        let record = Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")
            .with_prefix_synonyms(["DOID"]);
        assert_eq!(
            record.to_string(),
            "doid -> http://purl.obolibrary.org/obo/DOID_ (prefix synonyms: DOID)"
        );
    }
}
