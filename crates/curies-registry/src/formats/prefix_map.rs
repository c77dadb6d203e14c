//! Simple prefix maps: a JSON object of `prefix -> uri_prefix`.

use std::collections::BTreeMap;

use curies_types::Record;
use serde_json::{Map, Value};

use super::fold_prefix_pairs;
use crate::types::{CurieError, CurieResult};

const FORMAT: &str = "prefix map";

/// Parses a JSON object into records, in document order.
///
/// Entries whose value is not a string are skipped. Prefixes that repeat a
/// URI prefix become synonyms of the first one.
pub fn parse(text: &str) -> CurieResult<Vec<Record>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(records_from_object(&map)),
        _ => Err(CurieError::invalid_format(FORMAT, "expected a JSON object")),
    }
}

fn records_from_object(map: &Map<String, Value>) -> Vec<Record> {
    fold_prefix_pairs(map.iter().filter_map(|(prefix, value)| {
        value
            .as_str()
            .map(|uri_prefix| (prefix.as_str(), uri_prefix))
    }))
}

fn pairs(records: &[Record], include_synonyms: bool) -> impl Iterator<Item = (&str, &str)> {
    let take = if include_synonyms { usize::MAX } else { 1 };
    records.iter().flat_map(move |record| {
        record
            .all_prefixes()
            .take(take)
            .map(move |prefix| (prefix, record.uri_prefix.as_str()))
    })
}

/// Flattens records into a prefix map.
pub fn to_map(records: &[Record], include_synonyms: bool) -> BTreeMap<String, String> {
    pairs(records, include_synonyms)
        .map(|(prefix, uri_prefix)| (prefix.to_string(), uri_prefix.to_string()))
        .collect()
}

/// Renders records as a pretty-printed JSON prefix map.
///
/// Keys follow record order, each canonical prefix ahead of its synonyms.
pub fn to_string(records: &[Record], include_synonyms: bool) -> CurieResult<String> {
    let map: Map<String, Value> = pairs(records, include_synonyms)
        .map(|(prefix, uri_prefix)| (prefix.to_string(), Value::String(uri_prefix.to_string())))
        .collect();
    Ok(serde_json::to_string_pretty(&map)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_non_strings() {
        let records = parse(
            r#"{
                "CHEBI": "http://purl.obolibrary.org/obo/CHEBI_",
                "nested": {"@id": "http://example.org/"},
                "count": 3
            }"#,
        )
        .unwrap();
        assert_eq!(records, vec![Record::new("CHEBI", "http://purl.obolibrary.org/obo/CHEBI_")]);
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let records = parse(
            r#"{
                "zeta": "http://example.org/zeta/",
                "alpha": "http://example.org/alpha/",
                "Zeta": "http://example.org/zeta/"
            }"#,
        )
        .unwrap();
        let prefixes: Vec<&str> = records.iter().map(|r| r.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["zeta", "alpha"]);
        assert!(records[0].prefix_synonyms.contains("Zeta"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            parse("[1, 2]"),
            Err(CurieError::InvalidFormat { format: "prefix map", .. })
        ));
        assert!(matches!(parse("{"), Err(CurieError::Json(_))));
    }

    #[test]
    fn test_to_map_with_synonyms() {
        let records = vec![Record::new("go", "http://purl.obolibrary.org/obo/GO_").with_prefix_synonyms(["GO"])];
        assert_eq!(to_map(&records, false).len(), 1);

        let map = to_map(&records, true);
        assert_eq!(map["GO"], "http://purl.obolibrary.org/obo/GO_");
        assert_eq!(
            to_string(&records, false).unwrap(),
            "{\n  \"go\": \"http://purl.obolibrary.org/obo/GO_\"\n}"
        );
    }
}
