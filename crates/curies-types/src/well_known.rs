//! Well-known namespaces and URI prefixes.
//!
//! Constants for namespaces that appear throughout prefix registries and
//! the serialization formats they are exchanged in.
//!
//! # Examples
//!
//! ```
//! use curies_types::well_known;
//!
//! let doid = format!("{}DOID_", well_known::OBO_PURL);
//! assert_eq!(doid, "http://purl.obolibrary.org/obo/DOID_");
//! ```

// =============================================================================
// CURIE syntax
// =============================================================================

/// Separator between prefix and local identifier in a CURIE.
pub const DEFAULT_DELIMITER: &str = ":";

// =============================================================================
// Resolver bases
// =============================================================================

/// OBO Foundry PURL base, shared by every OBO ontology.
pub const OBO_PURL: &str = "http://purl.obolibrary.org/obo/";

/// Identifiers.org resolver base.
pub const IDENTIFIERS_ORG: &str = "https://identifiers.org/";

/// Bioregistry resolver base.
pub const BIOREGISTRY: &str = "https://bioregistry.io/";

// =============================================================================
// RDF vocabularies
// =============================================================================

/// SHACL namespace; `sh:prefix` / `sh:namespace` declare prefixes.
pub const SHACL_NAMESPACE: &str = "http://www.w3.org/ns/shacl#";

/// XML Schema datatypes namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// JSON-LD keyword marking the context block.
pub const JSONLD_CONTEXT: &str = "@context";
