//! Combining converters.

use std::borrow::Borrow;

use tracing::debug;

use crate::converter::Converter;
use crate::types::{CurieError, CurieResult};

impl Converter {
    /// Returns a new converter holding this converter's records followed by
    /// `other`'s.
    ///
    /// Records that repeat a mapping already present are merged; any other
    /// collision fails with [`CurieError::DuplicateRecord`]. Neither input is
    /// modified. The result keeps this converter's configuration.
    pub fn chain(&self, other: &Converter) -> CurieResult<Converter> {
        let mut chained = self.empty_like();
        for record in self.records().iter().chain(other.records()) {
            chained.add_record(record.clone())?;
        }
        debug!(
            left = self.len(),
            right = other.len(),
            chained = chained.len(),
            "chained converters"
        );
        Ok(chained)
    }

    /// Chains converters left to right.
    ///
    /// Fails with [`CurieError::EmptyChain`] when `converters` is empty.
    pub fn chain_all<I, C>(converters: I) -> CurieResult<Converter>
    where
        I: IntoIterator<Item = C>,
        C: Borrow<Converter>,
    {
        let mut converters = converters.into_iter();
        let first = converters.next().ok_or(CurieError::EmptyChain)?;
        let mut chained = first.borrow().chain(&Converter::new())?;
        for converter in converters {
            chained = chained.chain(converter.borrow())?;
        }
        Ok(chained)
    }
}

#[cfg(test)]
mod tests {
    use curies_types::Record;

    use super::*;
    use crate::types::ConverterConfig;

    fn left() -> Converter {
        Converter::from_records([
            Record::new("doid", "http://purl.obolibrary.org/obo/DOID_").with_prefix_synonyms(["DOID"]),
            Record::new("go", "http://purl.obolibrary.org/obo/GO_"),
        ])
        .unwrap()
    }

    #[test]
    fn test_chain_with_self_is_idempotent() {
        let converter = left();
        let chained = converter.chain(&converter).unwrap();
        assert_eq!(chained.records(), converter.records());
        assert_eq!(chained.get_prefixes(true), converter.get_prefixes(true));
    }

    #[test]
    fn test_chain_merges_synonyms_of_shared_records() {
        let right = Converter::from_records([
            Record::new("doid", "http://purl.obolibrary.org/obo/DOID_").with_prefix_synonyms(["do"]),
            Record::new("chebi", "http://purl.obolibrary.org/obo/CHEBI_"),
        ])
        .unwrap();

        let chained = left().chain(&right).unwrap();
        assert_eq!(chained.len(), 3);
        assert_eq!(chained.get_prefixes(false), vec!["doid", "go", "chebi"]);
        assert_eq!(chained.expand("do:1").unwrap(), "http://purl.obolibrary.org/obo/DOID_1");
        assert_eq!(chained.expand("DOID:1").unwrap(), "http://purl.obolibrary.org/obo/DOID_1");
    }

    #[test]
    fn test_chain_conflict_fails_and_inputs_untouched() {
        let base = left();
        let right = Converter::from_records([Record::new("disease", "http://purl.obolibrary.org/obo/DOID_")])
            .unwrap();

        assert!(matches!(
            base.chain(&right),
            Err(CurieError::DuplicateRecord { .. })
        ));
        assert_eq!(base.len(), 2);
        assert_eq!(right.len(), 1);
    }

    #[test]
    fn test_chain_keeps_left_config() {
        let mut base = Converter::with_config(ConverterConfig::with_delimiter("_"));
        base.add_prefix("GO", "http://purl.obolibrary.org/obo/GO:").unwrap();
        let chained = base.chain(&left()).unwrap();
        assert_eq!(chained.config().delimiter, "_");
        assert_eq!(chained.expand("GO_1").unwrap(), "http://purl.obolibrary.org/obo/GO:1");
    }

    #[test]
    fn test_chain_all() {
        let a = Converter::from_records([Record::new("a", "http://a/")]).unwrap();
        let b = Converter::from_records([Record::new("b", "http://b/")]).unwrap();
        let c = Converter::from_records([Record::new("c", "http://c/")]).unwrap();

        let chained = Converter::chain_all([&a, &b, &c]).unwrap();
        assert_eq!(chained.get_prefixes(false), vec!["a", "b", "c"]);

        let owned = Converter::chain_all(vec![a, b]).unwrap();
        assert_eq!(owned.len(), 2);

        assert!(matches!(
            Converter::chain_all(Vec::<Converter>::new()),
            Err(CurieError::EmptyChain)
        ));
    }
}
