//! CURIE / URI conversion over a registry index.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use curies_types::Record;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::index::{InsertOutcome, Lookup, RegistryIndex};
use crate::types::{ConverterConfig, CurieError, CurieResult};
use crate::validate::{IdentifierValidator, RegexValidator};

/// Expands CURIEs to URIs and compresses URIs to CURIEs.
///
/// Expansion always produces the canonical URI prefix and compression always
/// produces the canonical prefix, whichever synonym matched.
///
/// # Example
///
/// ```
/// use curies_registry::Converter;
/// use curies_types::Record;
///
/// let mut converter = Converter::new();
/// converter
///     .add_record(Record::new("doid", "http://purl.obolibrary.org/obo/DOID_").with_prefix_synonyms(["DOID"]))
///     .unwrap();
///
/// assert_eq!(converter.expand("DOID:1234").unwrap(), "http://purl.obolibrary.org/obo/DOID_1234");
/// assert_eq!(converter.compress("http://purl.obolibrary.org/obo/DOID_1234").unwrap(), "doid:1234");
/// ```
///
/// Queries take `&self` and may run concurrently; `add_record` takes
/// `&mut self`, so sharing a converter that is still being extended needs
/// external synchronization.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    index: RegistryIndex,
    config: ConverterConfig,
    validator: Option<Arc<dyn IdentifierValidator>>,
}

impl Serialize for Converter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.index.records().serialize(serializer)
    }
}

impl Converter {
    /// Creates an empty converter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty converter.
    ///
    /// Installs a [`RegexValidator`] when `config.validate_patterns` is set.
    pub fn with_config(config: ConverterConfig) -> Self {
        let validator: Option<Arc<dyn IdentifierValidator>> = if config.validate_patterns {
            Some(Arc::new(RegexValidator::new()))
        } else {
            None
        };
        Self {
            index: RegistryIndex::new(),
            config,
            validator,
        }
    }

    /// Replaces the identifier validator.
    ///
    /// Records already present are not re-checked.
    pub fn with_validator(mut self, validator: Arc<dyn IdentifierValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Creates a converter from records, failing on the first conflict.
    pub fn from_records<I>(records: I) -> CurieResult<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        Self::from_records_with_config(records, ConverterConfig::default())
    }

    /// Creates a converter from records with the given configuration.
    pub fn from_records_with_config<I>(records: I, config: ConverterConfig) -> CurieResult<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut converter = Self::with_config(config);
        for record in records {
            converter.add_record(record)?;
        }
        Ok(converter)
    }

    /// An empty converter sharing this converter's configuration and validator.
    pub(crate) fn empty_like(&self) -> Self {
        Self {
            index: RegistryIndex::with_capacity(self.index.len()),
            config: self.config.clone(),
            validator: self.validator.clone(),
        }
    }

    /// Returns the converter configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Returns the underlying index.
    pub fn index(&self) -> &RegistryIndex {
        &self.index
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MUTATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a record.
    ///
    /// Fails with [`CurieError::DuplicateRecord`] when one of its prefixes or
    /// URI prefixes is owned by a differently-mapped record. Re-adding a
    /// known `(prefix, uri_prefix)` pair merges its synonyms into the stored
    /// record. The converter is unchanged on error.
    pub fn add_record(&mut self, record: Record) -> CurieResult<()> {
        if let Some(validator) = &self.validator {
            validator.check_record(&record)?;
        }
        let outcome = self.index.insert(record)?;
        if let InsertOutcome::Merged(id) = outcome {
            debug!(record = id.index(), "record already present");
        }
        Ok(())
    }

    /// Replaces the record with the same canonical prefix.
    ///
    /// The old record's synonyms and URI prefixes are dropped unless the new
    /// record repeats them. Fails with [`CurieError::PrefixNotFound`] when
    /// no record has that canonical prefix.
    pub fn update_record(&mut self, record: Record) -> CurieResult<()> {
        if let Some(validator) = &self.validator {
            validator.check_record(&record)?;
        }
        self.index.replace(record)?;
        Ok(())
    }

    /// Adds a record without synonyms.
    pub fn add_prefix(&mut self, prefix: &str, uri_prefix: &str) -> CurieResult<()> {
        self.add_record(Record::new(prefix, uri_prefix))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP
    // ═══════════════════════════════════════════════════════════════════════════

    /// Finds the record owning a prefix (canonical or synonym).
    pub fn find_by_prefix(&self, prefix: &str) -> CurieResult<&Record> {
        self.lookup_prefix(prefix).map(|hit| hit.record)
    }

    /// Finds the record owning an exact URI prefix (canonical or synonym).
    pub fn find_by_uri_prefix(&self, uri_prefix: &str) -> CurieResult<&Record> {
        self.index
            .lookup_uri_prefix(uri_prefix)
            .map(|hit| hit.record)
            .ok_or_else(|| CurieError::UriNotFound {
                uri: uri_prefix.to_string(),
            })
    }

    /// Finds the record whose URI prefix is the longest prefix of `uri`.
    pub fn find_by_uri(&self, uri: &str) -> CurieResult<&Record> {
        self.lookup_uri(uri).map(|hit| hit.record)
    }

    fn lookup_prefix(&self, prefix: &str) -> CurieResult<Lookup<'_>> {
        self.index
            .lookup_prefix(prefix)
            .ok_or_else(|| CurieError::PrefixNotFound {
                prefix: prefix.to_string(),
            })
    }

    fn lookup_uri(&self, uri: &str) -> CurieResult<Lookup<'_>> {
        self.index
            .longest_match(uri)
            .ok_or_else(|| CurieError::UriNotFound {
                uri: uri.to_string(),
            })
    }

    fn split_curie<'a>(&self, curie: &'a str) -> CurieResult<(&'a str, &'a str)> {
        curie
            .split_once(self.config.delimiter.as_str())
            .ok_or_else(|| CurieError::InvalidCurie {
                curie: curie.to_string(),
                delimiter: self.config.delimiter.clone(),
            })
    }

    fn check_identifier(&self, record: &Record, local_id: &str) -> CurieResult<()> {
        match &self.validator {
            Some(validator) => validator.validate(record, local_id),
            None => Ok(()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONVERSION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Expands a CURIE to a URI using the canonical URI prefix.
    ///
    /// The CURIE is split on the first delimiter; everything after it is the
    /// local identifier.
    pub fn expand(&self, curie: &str) -> CurieResult<String> {
        let (prefix, local_id) = self.split_curie(curie)?;
        let record = self.lookup_prefix(prefix)?.record;
        self.check_identifier(record, local_id)?;
        Ok(format!("{}{}", record.uri_prefix, local_id))
    }

    /// Compresses a URI to a CURIE using the canonical prefix.
    pub fn compress(&self, uri: &str) -> CurieResult<String> {
        let hit = self.lookup_uri(uri)?;
        let local_id = uri.get(hit.key_len..).ok_or_else(|| CurieError::UriNotFound {
            uri: uri.to_string(),
        })?;
        self.check_identifier(hit.record, local_id)?;
        Ok(format!(
            "{}{}{}",
            hit.record.prefix, self.config.delimiter, local_id
        ))
    }

    /// Returns true if `curie` expands.
    pub fn is_curie(&self, curie: &str) -> bool {
        self.expand(curie).is_ok()
    }

    /// Returns true if `uri` compresses.
    pub fn is_uri(&self, uri: &str) -> bool {
        self.compress(uri).is_ok()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STANDARDIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Resolves a prefix or prefix synonym to the canonical prefix.
    pub fn standardize_prefix(&self, prefix: &str) -> CurieResult<String> {
        Ok(self.lookup_prefix(prefix)?.record.prefix.clone())
    }

    /// Rewrites a CURIE into canonical form by expanding then compressing it.
    ///
    /// Because compression uses longest match, a CURIE written against a
    /// generic prefix may come back under a more specific one.
    pub fn standardize_curie(&self, curie: &str) -> CurieResult<String> {
        self.compress(&self.expand(curie)?)
    }

    /// Rewrites a URI into canonical form by compressing then expanding it.
    pub fn standardize_uri(&self, uri: &str) -> CurieResult<String> {
        self.expand(&self.compress(uri)?)
    }

    /// Standardizes `input` if it is a CURIE known to this converter,
    /// otherwise compresses it as a URI.
    pub fn compress_or_standardize(&self, input: &str) -> CurieResult<String> {
        if self.is_curie(input) {
            self.standardize_curie(input)
        } else {
            self.compress(input)
        }
    }

    /// Expands `input` if it is a CURIE known to this converter, otherwise
    /// standardizes it as a URI.
    pub fn expand_or_standardize(&self, input: &str) -> CurieResult<String> {
        if self.is_curie(input) {
            self.expand(input)
        } else {
            self.standardize_uri(input)
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BATCH OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Expands every CURIE, preserving order.
    ///
    /// Fails with [`CurieError::Batch`] carrying the position and cause of
    /// the first failing element.
    pub fn expand_list<S: AsRef<str> + Sync>(&self, curies: &[S]) -> CurieResult<Vec<String>> {
        self.batch(curies, |curie| self.expand(curie))
    }

    /// Compresses every URI, preserving order. Fails like [`Converter::expand_list`].
    pub fn compress_list<S: AsRef<str> + Sync>(&self, uris: &[S]) -> CurieResult<Vec<String>> {
        self.batch(uris, |uri| self.compress(uri))
    }

    /// Expands every CURIE, yielding `None` for elements that fail.
    pub fn expand_list_lossy<S: AsRef<str> + Sync>(&self, curies: &[S]) -> Vec<Option<String>> {
        self.batch_each(curies, |curie| self.expand(curie))
            .into_iter()
            .map(Result::ok)
            .collect()
    }

    /// Compresses every URI, yielding `None` for elements that fail.
    pub fn compress_list_lossy<S: AsRef<str> + Sync>(&self, uris: &[S]) -> Vec<Option<String>> {
        self.batch_each(uris, |uri| self.compress(uri))
            .into_iter()
            .map(Result::ok)
            .collect()
    }

    fn batch<S, F>(&self, inputs: &[S], op: F) -> CurieResult<Vec<String>>
    where
        S: AsRef<str> + Sync,
        F: Fn(&str) -> CurieResult<String> + Sync,
    {
        let tag = |index: usize, err: CurieError| CurieError::Batch {
            index,
            source: Box::new(err),
        };

        #[cfg(feature = "parallel")]
        {
            if inputs.len() >= self.config.parallel_threshold {
                // evaluate everything, then report the earliest failure
                return self
                    .batch_each(inputs, &op)
                    .into_iter()
                    .enumerate()
                    .map(|(index, result)| result.map_err(|err| tag(index, err)))
                    .collect();
            }
        }

        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| op(input.as_ref()).map_err(|err| tag(index, err)))
            .collect()
    }

    fn batch_each<S, F>(&self, inputs: &[S], op: F) -> Vec<CurieResult<String>>
    where
        S: AsRef<str> + Sync,
        F: Fn(&str) -> CurieResult<String> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            if inputs.len() >= self.config.parallel_threshold {
                return inputs.par_iter().map(|input| op(input.as_ref())).collect();
            }
        }

        inputs.iter().map(|input| op(input.as_ref())).collect()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTROSPECTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns prefixes in insertion order.
    ///
    /// With `include_synonyms`, each record's synonyms follow its canonical prefix.
    pub fn get_prefixes(&self, include_synonyms: bool) -> Vec<String> {
        self.index
            .records()
            .iter()
            .flat_map(|record| {
                let take = if include_synonyms { usize::MAX } else { 1 };
                record.all_prefixes().take(take).map(str::to_string)
            })
            .collect()
    }

    /// Returns URI prefixes in insertion order.
    ///
    /// With `include_synonyms`, each record's synonyms follow its canonical URI prefix.
    pub fn get_uri_prefixes(&self, include_synonyms: bool) -> Vec<String> {
        self.index
            .records()
            .iter()
            .flat_map(|record| {
                let take = if include_synonyms { usize::MAX } else { 1 };
                record.all_uri_prefixes().take(take).map(str::to_string)
            })
            .collect()
    }

    /// Returns all records in insertion order.
    pub fn records(&self) -> &[Record] {
        self.index.records()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the converter holds no records.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converter contains {} records", self.len())
    }
}
