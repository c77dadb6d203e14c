//! Extended prefix maps: a JSON array of full records.

use curies_types::Record;

use crate::types::CurieResult;

/// Parses a JSON array of record objects.
///
/// Missing synonym fields default to empty sets.
pub fn parse(text: &str) -> CurieResult<Vec<Record>> {
    Ok(serde_json::from_str(text)?)
}

/// Renders records as a pretty-printed JSON array.
pub fn to_string(records: &[Record]) -> CurieResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
