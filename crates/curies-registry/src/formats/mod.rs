//! Registry serialization formats.
//!
//! Every reader produces an ordered `Vec<Record>` and every writer consumes
//! [`Converter::records`]; the index itself never sees a format.
//!
//! | Format | Reader | Writer |
//! |--------|--------|--------|
//! | Prefix map (JSON object) | [`prefix_map::parse`] | [`prefix_map::to_string`] |
//! | Extended prefix map (JSON array) | [`extended::parse`] | [`extended::to_string`] |
//! | JSON-LD `@context` | [`jsonld::parse`] | [`jsonld::to_string`] |
//! | SHACL prefix declarations | [`shacl::parse`] | [`shacl::to_string`] |
//! | Tab-separated registry | [`tsv::TsvReader`] | [`tsv::write_records`] |

pub mod extended;
pub mod jsonld;
pub mod prefix_map;
pub mod shacl;
pub mod tsv;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use curies_types::Record;

use crate::converter::Converter;
use crate::types::{ConverterConfig, CurieError, CurieResult};

/// Builds records from `prefix -> uri_prefix` pairs, keeping their order.
///
/// Prefixes that share a URI prefix collapse into one record: the first one
/// seen is canonical and the rest become its prefix synonyms. Flat maps
/// carry synonyms this way.
pub(crate) fn fold_prefix_pairs<I, K, V>(pairs: I) -> Vec<Record>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut records: Vec<Record> = Vec::new();
    let mut owners: HashMap<String, usize> = HashMap::new();
    for (prefix, uri_prefix) in pairs {
        let (prefix, uri_prefix) = (prefix.into(), uri_prefix.into());
        match owners.get(&uri_prefix) {
            Some(&i) => {
                records[i].prefix_synonyms.insert(prefix);
            }
            None => {
                owners.insert(uri_prefix.clone(), records.len());
                records.push(Record::new(prefix, uri_prefix));
            }
        }
    }
    records
}

/// Accepted input shapes for building a converter.
#[derive(Debug, Clone)]
pub enum RecordSource {
    /// Plain `prefix -> uri_prefix` pairs. Prefixes sharing a URI prefix
    /// become synonyms of the first in key order.
    PrefixMap(BTreeMap<String, String>),
    /// Fully specified records.
    Records(Vec<Record>),
    /// A single record.
    Record(Record),
}

impl RecordSource {
    /// Normalizes the source into records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::PrefixMap(map) => fold_prefix_pairs(map),
            Self::Records(records) => records,
            Self::Record(record) => vec![record],
        }
    }
}

impl From<BTreeMap<String, String>> for RecordSource {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::PrefixMap(map)
    }
}

impl From<HashMap<String, String>> for RecordSource {
    fn from(map: HashMap<String, String>) -> Self {
        Self::PrefixMap(map.into_iter().collect())
    }
}

impl From<Vec<Record>> for RecordSource {
    fn from(records: Vec<Record>) -> Self {
        Self::Records(records)
    }
}

impl From<Record> for RecordSource {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

/// On-disk registry formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryFormat {
    /// JSON object mapping prefixes to URI prefixes.
    PrefixMap,
    /// JSON array of record objects.
    ExtendedPrefixMap,
    /// JSON-LD document with an `@context` object.
    JsonLd,
    /// Turtle document with SHACL prefix declarations.
    Shacl,
    /// Tab-separated registry with a header row.
    Tsv,
}

impl RegistryFormat {
    /// Returns the short name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::PrefixMap => "prefix-map",
            Self::ExtendedPrefixMap => "epm",
            Self::JsonLd => "jsonld",
            Self::Shacl => "shacl",
            Self::Tsv => "tsv",
        }
    }

    /// Infers the format from a file name.
    ///
    /// `*.epm.json` is an extended prefix map; any other `*.json` is a
    /// plain prefix map.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => {
                let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
                if stem.ends_with(".epm") {
                    Some(Self::ExtendedPrefixMap)
                } else {
                    Some(Self::PrefixMap)
                }
            }
            "epm" => Some(Self::ExtendedPrefixMap),
            "jsonld" => Some(Self::JsonLd),
            "ttl" => Some(Self::Shacl),
            "tsv" => Some(Self::Tsv),
            _ => None,
        }
    }
}

impl fmt::Display for RegistryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RegistryFormat {
    type Err = CurieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix-map" | "prefixmap" | "json" => Ok(Self::PrefixMap),
            "epm" | "extended-prefix-map" => Ok(Self::ExtendedPrefixMap),
            "jsonld" | "json-ld" => Ok(Self::JsonLd),
            "shacl" | "ttl" | "turtle" => Ok(Self::Shacl),
            "tsv" => Ok(Self::Tsv),
            other => Err(CurieError::invalid_format(
                "registry",
                format!("unknown format '{other}'"),
            )),
        }
    }
}

/// Parses in-memory registry text.
pub fn parse_str(text: &str, format: RegistryFormat) -> CurieResult<Vec<Record>> {
    match format {
        RegistryFormat::PrefixMap => prefix_map::parse(text),
        RegistryFormat::ExtendedPrefixMap => extended::parse(text),
        RegistryFormat::JsonLd => jsonld::parse(text),
        RegistryFormat::Shacl => shacl::parse(text),
        RegistryFormat::Tsv => tsv::TsvReader::from_reader(text.as_bytes())?.parse_all(),
    }
}

/// Reads records from a file, inferring the format from its name when
/// `format` is `None`.
pub fn load_path<P: AsRef<Path>>(path: P, format: Option<RegistryFormat>) -> CurieResult<Vec<Record>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CurieError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let format = format
        .or_else(|| RegistryFormat::from_path(path))
        .ok_or_else(|| {
            CurieError::invalid_format(
                "registry",
                format!("cannot infer format of {}", path.display()),
            )
        })?;

    match format {
        RegistryFormat::Tsv => tsv::TsvReader::from_path(path)?.parse_all(),
        other => parse_str(&fs::read_to_string(path)?, other),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERTER CONSTRUCTION AND EXPORT
// ═══════════════════════════════════════════════════════════════════════════════

impl Converter {
    /// Creates a converter from any accepted input shape.
    pub fn from_source(source: impl Into<RecordSource>) -> CurieResult<Self> {
        Self::from_records(source.into().into_records())
    }

    /// Creates a converter from `prefix -> uri_prefix` pairs.
    pub fn from_prefix_map<I, K, V>(pairs: I) -> CurieResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_records(
            pairs
                .into_iter()
                .map(|(prefix, uri_prefix)| Record::new(prefix, uri_prefix)),
        )
    }

    /// Creates a converter from an extended prefix map JSON document.
    pub fn from_extended_prefix_map(json: &str) -> CurieResult<Self> {
        Self::from_records(extended::parse(json)?)
    }

    /// Creates a converter from a JSON-LD context document.
    pub fn from_jsonld(json: &str) -> CurieResult<Self> {
        Self::from_records(jsonld::parse(json)?)
    }

    /// Creates a converter from SHACL prefix declarations.
    pub fn from_shacl(turtle: &str) -> CurieResult<Self> {
        Self::from_records(shacl::parse(turtle)?)
    }

    /// Creates a converter from a tab-separated registry file.
    pub fn from_tsv_path<P: AsRef<Path>>(path: P) -> CurieResult<Self> {
        Self::from_records(tsv::TsvReader::from_path(path)?.parse_all()?)
    }

    /// Creates a converter from a registry file.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        format: Option<RegistryFormat>,
        config: ConverterConfig,
    ) -> CurieResult<Self> {
        Self::from_records_with_config(load_path(path, format)?, config)
    }

    /// Returns the canonical `prefix -> uri_prefix` map.
    ///
    /// With `include_synonyms`, prefix synonyms map to the canonical URI prefix
    /// too. Such a map reads back through [`Converter::from_source`], with the
    /// first prefix in key order as canonical.
    pub fn to_prefix_map(&self, include_synonyms: bool) -> BTreeMap<String, String> {
        prefix_map::to_map(self.records(), include_synonyms)
    }

    /// Renders the canonical prefix map as JSON.
    pub fn write_prefix_map(&self) -> CurieResult<String> {
        prefix_map::to_string(self.records(), false)
    }

    /// Renders every record, synonyms and patterns included, as JSON.
    pub fn write_extended_prefix_map(&self) -> CurieResult<String> {
        extended::to_string(self.records())
    }

    /// Renders a JSON-LD context.
    ///
    /// With `include_synonyms`, prefix synonyms follow their canonical prefix
    /// as extra terms, and [`Converter::from_jsonld`] folds them back.
    pub fn write_jsonld(&self, include_synonyms: bool) -> CurieResult<String> {
        jsonld::to_string(self.records(), include_synonyms)
    }

    /// Renders SHACL prefix declarations.
    pub fn write_shacl(&self) -> CurieResult<String> {
        shacl::to_string(self.records())
    }

    /// Writes a tab-separated registry.
    pub fn write_tsv<W: Write>(&self, writer: W) -> CurieResult<()> {
        tsv::write_records(writer, self.records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RegistryFormat::from_path(Path::new("bioregistry.epm.json")),
            Some(RegistryFormat::ExtendedPrefixMap)
        );
        assert_eq!(
            RegistryFormat::from_path(Path::new("obo.json")),
            Some(RegistryFormat::PrefixMap)
        );
        assert_eq!(
            RegistryFormat::from_path(Path::new("/tmp/context.JSONLD")),
            Some(RegistryFormat::JsonLd)
        );
        assert_eq!(
            RegistryFormat::from_path(Path::new("prefixes.ttl")),
            Some(RegistryFormat::Shacl)
        );
        assert_eq!(RegistryFormat::from_path(Path::new("registry")), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("EPM".parse::<RegistryFormat>().unwrap(), RegistryFormat::ExtendedPrefixMap);
        assert_eq!("json-ld".parse::<RegistryFormat>().unwrap(), RegistryFormat::JsonLd);
        assert!("yaml".parse::<RegistryFormat>().is_err());
        assert_eq!(RegistryFormat::Tsv.to_string(), "tsv");
    }

    #[test]
    fn test_record_source_shapes() {
        let mut map = HashMap::new();
        map.insert("doid".to_string(), "http://purl.obolibrary.org/obo/DOID_".to_string());
        let from_map = Converter::from_source(map).unwrap();
        assert_eq!(from_map.expand("doid:1").unwrap(), "http://purl.obolibrary.org/obo/DOID_1");

        let record = Record::new("go", "http://purl.obolibrary.org/obo/GO_").with_prefix_synonyms(["GO"]);
        let from_record = Converter::from_source(record.clone()).unwrap();
        assert_eq!(from_record.standardize_prefix("GO").unwrap(), "go");

        let from_list = Converter::from_source(vec![record]).unwrap();
        assert_eq!(from_list.len(), 1);
    }

    #[test]
    fn test_from_prefix_map_conflict() {
        let result = Converter::from_prefix_map([
            ("a", "http://example.org/"),
            ("b", "http://example.org/"),
        ]);
        assert!(matches!(result, Err(CurieError::DuplicateRecord { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_path("/nonexistent/registry.tsv", None);
        assert!(matches!(result, Err(CurieError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_str_dispatch() {
        let records = parse_str(r#"{"GO": "http://purl.obolibrary.org/obo/GO_"}"#, RegistryFormat::PrefixMap).unwrap();
        assert_eq!(records, vec![Record::new("GO", "http://purl.obolibrary.org/obo/GO_")]);

        let tsv = "prefix\turi_prefix\tprefix_synonyms\turi_prefix_synonyms\tpattern\n\
                   go\thttp://purl.obolibrary.org/obo/GO_\tGO|gomf\t\t\n";
        let records = parse_str(tsv, RegistryFormat::Tsv).unwrap();
        assert!(records[0].has_prefix("gomf"));
    }

    #[test]
    fn test_export_round_trip_through_jsonld_and_shacl() {
        let converter = Converter::from_records([
            Record::new("doid", "http://purl.obolibrary.org/obo/DOID_").with_prefix_synonyms(["DOID"]),
            Record::new("obo", "http://purl.obolibrary.org/obo/"),
        ])
        .unwrap();

        let jsonld = Converter::from_jsonld(&converter.write_jsonld(false).unwrap()).unwrap();
        assert_eq!(jsonld.get_prefixes(false).len(), 2);
        assert_eq!(jsonld.compress("http://purl.obolibrary.org/obo/DOID_1").unwrap(), "doid:1");

        let shacl = Converter::from_shacl(&converter.write_shacl().unwrap()).unwrap();
        let mut prefixes = shacl.get_prefixes(false);
        prefixes.sort();
        assert_eq!(prefixes, vec!["doid", "obo"]);

        let epm = Converter::from_extended_prefix_map(&converter.write_extended_prefix_map().unwrap()).unwrap();
        assert_eq!(epm.standardize_prefix("DOID").unwrap(), "doid");

        assert_eq!(converter.to_prefix_map(true).len(), 3);
    }

    #[test]
    fn test_synonym_exports_read_back() {
        let converter = Converter::from_records([
            Record::new("doid", "http://purl.obolibrary.org/obo/DOID_").with_prefix_synonyms(["DOID"]),
            Record::new("go", "http://purl.obolibrary.org/obo/GO_").with_prefix_synonyms(["GO", "gomf"]),
        ])
        .unwrap();

        let jsonld = Converter::from_jsonld(&converter.write_jsonld(true).unwrap()).unwrap();
        assert_eq!(jsonld.len(), 2);
        assert_eq!(jsonld.get_prefixes(false), vec!["doid", "go"]);
        assert_eq!(jsonld.standardize_prefix("gomf").unwrap(), "go");
        assert_eq!(jsonld.standardize_curie("DOID:4").unwrap(), "doid:4");

        let map = converter.to_prefix_map(true);
        assert_eq!(map.len(), 5);
        let from_map = Converter::from_source(map).unwrap();
        assert_eq!(from_map.len(), 2);
        assert_eq!(from_map.expand("gomf:1").unwrap(), "http://purl.obolibrary.org/obo/GO_1");
        assert_eq!(
            from_map.standardize_prefix("doid").unwrap(),
            from_map.standardize_prefix("DOID").unwrap()
        );

        let json = prefix_map::to_string(converter.records(), true).unwrap();
        let from_json = Converter::from_records(prefix_map::parse(&json).unwrap()).unwrap();
        assert_eq!(from_json.get_prefixes(false), vec!["doid", "go"]);
        assert_eq!(from_json.standardize_prefix("GO").unwrap(), "go");
    }
}
