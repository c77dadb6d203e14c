//! SHACL prefix declarations in Turtle.
//!
//! Reads the `sh:prefix` / `sh:namespace` pairs of `sh:declare` blocks:
//!
//! ```text
//! @prefix sh: <http://www.w3.org/ns/shacl#> .
//! @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
//!
//! [
//!   sh:declare
//!     [ sh:prefix "doid" ; sh:namespace "http://purl.obolibrary.org/obo/DOID_"^^xsd:anyURI ]
//! ] .
//! ```
//!
//! Documents are parsed with sophia's TriG parser, so any label bound to
//! the SHACL namespace works, and full IRIs do too.

use curies_types::{well_known, Record};
use sophia::api::dataset::Dataset as _;
use sophia::api::graph::MutableGraph as _;
use sophia::api::ns::{xsd, Namespace};
use sophia::api::prefix::Prefix;
use sophia::api::quad::Quad as _;
use sophia::api::serializer::{Stringifier as _, TripleSerializer as _};
use sophia::api::source::QuadSource as _;
use sophia::api::term::matcher::Any;
use sophia::api::term::{BnodeId, Term};
use sophia::inmem::dataset::LightDataset;
use sophia::inmem::graph::LightGraph;
use sophia::iri::Iri;
use sophia::turtle::parser::trig;
use sophia::turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};

use crate::types::{CurieError, CurieResult};

const FORMAT: &str = "SHACL";

fn rdf_error(error: impl std::fmt::Display) -> CurieError {
    CurieError::invalid_format(FORMAT, error.to_string())
}

/// Lexical form of a literal, or the text of an IRI.
fn term_text<T: Term>(term: T) -> Option<String> {
    if let Some(value) = term.lexical_form() {
        let text: &str = &value;
        return Some(text.to_string());
    }
    term.iri().map(|iri| iri.as_str().to_string())
}

/// Extracts prefix declarations from a Turtle document.
///
/// A subject with an `sh:prefix` must also carry an `sh:namespace`, and the
/// other way round.
pub fn parse(text: &str) -> CurieResult<Vec<Record>> {
    let dataset: LightDataset = trig::parse_str(text).collect_quads().map_err(rdf_error)?;
    let shacl = Namespace::new(well_known::SHACL_NAMESPACE).map_err(rdf_error)?;
    let sh_prefix = shacl.get("prefix").map_err(rdf_error)?;
    let sh_namespace = shacl.get("namespace").map_err(rdf_error)?;

    let mut records = Vec::new();
    for quad in dataset.quads_matching(Any, [&sh_prefix], Any, Any) {
        let quad = quad.map_err(rdf_error)?;
        let prefix = term_text(quad.o()).ok_or_else(|| {
            CurieError::invalid_format(FORMAT, format!("sh:prefix is not a literal: {:?}", quad.o()))
        })?;
        let namespace = dataset
            .quads_matching([quad.s()], [&sh_namespace], Any, Any)
            .next()
            .transpose()
            .map_err(rdf_error)?
            .ok_or_else(|| {
                CurieError::invalid_format(FORMAT, format!("prefix '{prefix}' has no sh:namespace"))
            })?;
        let uri_prefix = term_text(namespace.o()).ok_or_else(|| {
            CurieError::invalid_format(
                FORMAT,
                format!("sh:namespace of '{prefix}' is not a literal or IRI"),
            )
        })?;
        records.push(Record::new(prefix, uri_prefix));
    }

    for quad in dataset.quads_matching(Any, [&sh_namespace], Any, Any) {
        let quad = quad.map_err(rdf_error)?;
        if dataset
            .quads_matching([quad.s()], [&sh_prefix], Any, Any)
            .next()
            .is_none()
        {
            return Err(CurieError::invalid_format(
                FORMAT,
                format!("namespace {:?} has no sh:prefix", quad.o()),
            ));
        }
    }

    Ok(records)
}

/// Renders canonical prefixes as SHACL declarations.
pub fn to_string(records: &[Record]) -> CurieResult<String> {
    let shacl = Namespace::new(well_known::SHACL_NAMESPACE).map_err(rdf_error)?;
    let sh_declare = shacl.get("declare").map_err(rdf_error)?;
    let sh_prefix = shacl.get("prefix").map_err(rdf_error)?;
    let sh_namespace = shacl.get("namespace").map_err(rdf_error)?;

    let mut graph = LightGraph::new();
    let root = BnodeId::new_unchecked("declarations".to_string());
    for (i, record) in records.iter().enumerate() {
        let declaration = BnodeId::new_unchecked(format!("d{i}"));
        graph
            .insert(&root, &sh_declare, &declaration)
            .map_err(rdf_error)?;
        graph
            .insert(&declaration, &sh_prefix, record.prefix.as_str())
            .map_err(rdf_error)?;
        graph
            .insert(
                &declaration,
                &sh_namespace,
                record.uri_prefix.as_str() * xsd::anyURI,
            )
            .map_err(rdf_error)?;
    }

    let prefixes = [
        (
            Prefix::new_unchecked("sh".to_string()),
            Iri::new_unchecked(well_known::SHACL_NAMESPACE.to_string()),
        ),
        (
            Prefix::new_unchecked("xsd".to_string()),
            Iri::new_unchecked(well_known::XSD_NAMESPACE.to_string()),
        ),
    ];
    let config = TurtleConfig::new()
        .with_pretty(true)
        .with_prefix_map(&prefixes[..]);
    let mut stringifier = TurtleSerializer::new_stringifier_with_config(config);
    Ok(stringifier.serialize_graph(&graph).map_err(rdf_error)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut records: Vec<Record>) -> Vec<Record> {
        records.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        records
    }

    #[test]
    fn test_parse_declare_block() {
        let text = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

            # two declarations
            [
              sh:declare
                [ sh:prefix "CHEBI" ; sh:namespace "http://purl.obolibrary.org/obo/CHEBI_"^^xsd:anyURI ],
                [ sh:prefix 'HP' ; sh:namespace <http://purl.obolibrary.org/obo/HP_> ]
            ] .
        "#;
        let records = sorted(parse(text).unwrap());
        assert_eq!(
            records,
            vec![
                Record::new("CHEBI", "http://purl.obolibrary.org/obo/CHEBI_"),
                Record::new("HP", "http://purl.obolibrary.org/obo/HP_"),
            ]
        );
    }

    #[test]
    fn test_parse_custom_label_and_subject_form() {
        let text = "PREFIX shacl: <http://www.w3.org/ns/shacl#>\n\
                    PREFIX ex: <http://example.org/>\n\
                    ex:decl shacl:prefix \"go\" ; shacl:namespace \"http://purl.obolibrary.org/obo/GO_\" .\n";
        let records = parse(text).unwrap();
        assert_eq!(records, vec![Record::new("go", "http://purl.obolibrary.org/obo/GO_")]);
    }

    #[test]
    fn test_parse_full_iri_predicates() {
        let text = r#"[ <http://www.w3.org/ns/shacl#prefix> """so""" ;
                        <http://www.w3.org/ns/shacl#namespace> "http://purl.obolibrary.org/obo/SO_" ] ."#;
        let records = parse(text).unwrap();
        assert_eq!(records[0].prefix, "so");
    }

    #[test]
    fn test_parse_unicode_escapes() {
        let text = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            [ sh:prefix "a\u0062c" ; sh:namespace "http://example.org/\U00000041/" ] .
        "#;
        let records = parse(text).unwrap();
        assert_eq!(records, vec![Record::new("abc", "http://example.org/A/")]);
    }

    #[test]
    fn test_parse_errors() {
        let sh = "@prefix sh: <http://www.w3.org/ns/shacl#> .\n";
        assert!(parse(&format!("{sh}[ sh:prefix \"go\" ] .")).is_err());
        assert!(parse(&format!("{sh}[ sh:namespace \"http://x/\" ] .")).is_err());
        assert!(parse(&format!("{sh}[ sh:prefix \"go")).is_err());
        assert!(parse(&format!("{sh}[ sh:namespace <http://x/ ]")).is_err());
        assert!(matches!(
            parse("[ undeclared:prefix \"go\" ] ."),
            Err(CurieError::InvalidFormat { format: "SHACL", .. })
        ));
    }

    #[test]
    fn test_round_trip_with_escapes() {
        let records = vec![
            Record::new("doid", "http://purl.obolibrary.org/obo/DOID_"),
            Record::new("odd", "http://example.org/\"quoted\"/"),
        ];
        let text = to_string(&records).unwrap();
        assert!(text.contains(well_known::SHACL_NAMESPACE));
        assert_eq!(sorted(parse(&text).unwrap()), records);
    }

    #[test]
    fn test_empty_registry() {
        let text = to_string(&[]).unwrap();
        assert!(parse(&text).unwrap().is_empty());
    }
}
