//! # curies-types
//!
//! Type definitions for CURIE prefix registries.
//!
//! A registry is a set of [`Record`]s, each associating a canonical prefix
//! (`doid`) with a canonical URI prefix (`http://purl.obolibrary.org/obo/DOID_`)
//! and optional synonyms for both.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use curies_types::{Record, well_known};
//!
//! let record = Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")
//!     .with_prefix_synonyms(["DOID"]);
//!
//! assert!(record.uri_prefix.starts_with(well_known::OBO_PURL));
//! assert_eq!(record.all_prefixes().count(), 2);
//! ```

#![warn(missing_docs)]

mod record;
pub mod well_known;

// Re-export all public types at crate root
pub use record::{FieldValue, Record, RecordError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let record = Record::new("go", "http://purl.obolibrary.org/obo/GO_");
        assert!(record.validate().is_ok());
        let _err = RecordError::EmptyPrefix;
    }

    #[test]
    fn test_well_known_accessible() {
        assert_eq!(well_known::DEFAULT_DELIMITER, ":");
        assert_eq!(well_known::SHACL_NAMESPACE, "http://www.w3.org/ns/shacl#");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let record = Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")
            .with_prefix_synonyms(["DOID"])
            .with_uri_prefix_synonyms(["https://identifiers.org/DOID:"])
            .with_pattern("^\\d+$");

        let json = serde_json::to_string(&record).unwrap();
        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
        assert_eq!(parsed.prefix_synonyms, record.prefix_synonyms);
        assert_eq!(parsed.pattern.as_deref(), Some("^\\d+$"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_defaults_for_missing_synonyms() {
        let json = r#"{"prefix": "obo", "uri_prefix": "http://purl.obolibrary.org/obo/"}"#;
        let parsed: Record = serde_json::from_str(json).unwrap();
        assert!(parsed.prefix_synonyms.is_empty());
        assert!(parsed.uri_prefix_synonyms.is_empty());
        assert!(parsed.pattern.is_none());
    }
}
