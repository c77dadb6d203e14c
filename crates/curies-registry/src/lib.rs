//! # curies-registry
//!
//! Bidirectional conversion between CURIEs (`doid:1234`) and URIs
//! (`http://purl.obolibrary.org/obo/DOID_1234`).
//!
//! A [`Converter`] wraps a [`RegistryIndex`] that enforces uniqueness of
//! every prefix and URI prefix, canonical or synonym, and answers
//! longest-prefix queries over URIs with a byte trie.
//!
//! ## Features
//!
//! - `parallel` (default): Batch operations fan out across threads with
//!   rayon once they reach [`ConverterConfig::parallel_threshold`] elements.
//!
//! ## Usage
//!
//! ```rust
//! use curies_registry::Converter;
//! use curies_types::Record;
//!
//! let doid = Converter::from_records([Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")])?;
//! let obo = Converter::from_prefix_map([("obo", "http://purl.obolibrary.org/obo/")])?;
//! let merged = doid.chain(&obo)?;
//!
//! assert_eq!(merged.expand("obo:1234")?, "http://purl.obolibrary.org/obo/1234");
//! assert_eq!(merged.compress("http://purl.obolibrary.org/obo/DOID_1234")?, "doid:1234");
//! # Ok::<(), curies_registry::CurieError>(())
//! ```
//!
//! Predefined registries live in [`sources`].

#![warn(missing_docs)]

mod chain;
mod converter;
pub mod formats;
mod index;
pub mod sources;
mod types;
mod validate;

// Re-export curies-types for convenience
pub use curies_types;

pub use converter::Converter;
pub use formats::{RecordSource, RegistryFormat};
pub use index::{InsertOutcome, Lookup, MatchKind, RecordId, RegistryIndex};
pub use sources::PredefinedRegistry;
pub use types::{ConverterConfig, CurieError, CurieResult};
pub use validate::{IdentifierValidator, RegexValidator};
