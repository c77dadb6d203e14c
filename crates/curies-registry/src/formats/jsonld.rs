//! JSON-LD contexts.
//!
//! Only string-valued context entries are prefixes. Keywords (`@vocab`,
//! `@base`, ...) and term definitions given as objects are skipped.

use curies_types::{well_known, Record};
use serde_json::{Map, Value};

use super::fold_prefix_pairs;
use crate::types::{CurieError, CurieResult};

const FORMAT: &str = "JSON-LD";

/// Parses the `@context` object of a JSON-LD document.
///
/// Terms are read in document order. A term that repeats an earlier URI
/// prefix becomes a synonym of that earlier term.
pub fn parse(text: &str) -> CurieResult<Vec<Record>> {
    let document: Value = serde_json::from_str(text)?;
    let context = document
        .get(well_known::JSONLD_CONTEXT)
        .ok_or_else(|| CurieError::invalid_format(FORMAT, "missing @context"))?;
    let Value::Object(context) = context else {
        return Err(CurieError::invalid_format(FORMAT, "@context is not an object"));
    };

    Ok(fold_prefix_pairs(
        context
            .iter()
            .filter(|(key, _)| !key.starts_with('@'))
            .filter_map(|(prefix, value)| {
                value
                    .as_str()
                    .map(|uri_prefix| (prefix.as_str(), uri_prefix))
            }),
    ))
}

/// Renders records as a JSON-LD context.
///
/// With `include_synonyms`, prefix synonyms are emitted right after their
/// canonical term, bound to the same URI prefix.
pub fn to_string(records: &[Record], include_synonyms: bool) -> CurieResult<String> {
    let mut context = Map::new();
    for record in records {
        let take = if include_synonyms { usize::MAX } else { 1 };
        for prefix in record.all_prefixes().take(take) {
            context.insert(prefix.to_string(), Value::String(record.uri_prefix.clone()));
        }
    }

    let mut document = Map::new();
    document.insert(well_known::JSONLD_CONTEXT.to_string(), Value::Object(context));
    Ok(serde_json::to_string_pretty(&Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_keywords_and_objects() {
        let records = parse(
            r#"{
                "@context": {
                    "@vocab": "http://example.org/vocab/",
                    "DOID": "http://purl.obolibrary.org/obo/DOID_",
                    "label": {"@id": "http://www.w3.org/2000/01/rdf-schema#label"},
                    "HP": "http://purl.obolibrary.org/obo/HP_"
                }
            }"#,
        )
        .unwrap();
        let prefixes: Vec<&str> = records.iter().map(|r| r.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["DOID", "HP"]);
    }

    #[test]
    fn test_parse_requires_context_object() {
        assert!(matches!(
            parse(r#"{"DOID": "http://purl.obolibrary.org/obo/DOID_"}"#),
            Err(CurieError::InvalidFormat { format: "JSON-LD", .. })
        ));
        assert!(matches!(
            parse(r#"{"@context": ["http://example.org/context.jsonld"]}"#),
            Err(CurieError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_to_string_with_synonyms() {
        let records = vec![Record::new("doid", "http://purl.obolibrary.org/obo/DOID_").with_prefix_synonyms(["DOID"])];

        let canonical = parse(&to_string(&records, false).unwrap()).unwrap();
        assert_eq!(canonical.len(), 1);
        assert!(canonical[0].prefix_synonyms.is_empty());

        let text = to_string(&records, true).unwrap();
        assert!(text.find("\"doid\"") < text.find("\"DOID\""));
        assert_eq!(parse(&text).unwrap(), records);
        assert!(parse(&text).unwrap()[0].prefix_synonyms.contains("DOID"));
    }
}
