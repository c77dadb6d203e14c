//! In-memory registry index.
//!
//! Owns every [`Record`] in an arena and indexes them two ways:
//!
//! - `by_prefix`: hash map from every prefix (canonical or synonym) to the
//!   owning record, O(1) expected lookup.
//! - `by_uri_prefix`: byte trie over every URI prefix (canonical or synonym),
//!   answering "longest registered URI prefix of this URI" in time
//!   proportional to the URI length.
//!
//! Both structures hold [`RecordId`]s into the arena, never records.

use std::collections::HashMap;

use curies_types::Record;
use tracing::debug;

use crate::types::{CurieError, CurieResult};

/// Stable position of a record in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    /// Returns the arena position.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a key matched a record's canonical value or one of its synonyms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// The canonical prefix or URI prefix.
    Canonical,
    /// A prefix synonym or URI prefix synonym.
    Synonym,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexEntry {
    id: RecordId,
    kind: MatchKind,
}

/// Result of a successful index lookup.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a> {
    /// Arena id of the owning record.
    pub id: RecordId,
    /// How the key matched.
    pub kind: MatchKind,
    /// The owning record.
    pub record: &'a Record,
    /// Byte length of the matched key.
    pub key_len: usize,
}

/// Outcome of [`RegistryIndex::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new record was stored.
    Added(RecordId),
    /// The record repeated an existing mapping; its synonyms were merged in.
    Merged(RecordId),
}

impl InsertOutcome {
    /// Returns the id of the stored record.
    pub fn id(self) -> RecordId {
        match self {
            Self::Added(id) | Self::Merged(id) => id,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// URI PREFIX TRIE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
struct TrieNode {
    /// Children sorted by edge byte.
    children: Vec<(u8, usize)>,
    value: Option<IndexEntry>,
}

/// Byte-level trie over URI prefixes.
///
/// Nodes live in a flat vector and refer to each other by position.
#[derive(Debug, Clone)]
struct UriTrie {
    nodes: Vec<TrieNode>,
    len: usize,
}

impl Default for UriTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            len: 0,
        }
    }
}

impl UriTrie {
    fn child(&self, node: usize, byte: u8) -> Option<usize> {
        let children = &self.nodes[node].children;
        children
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|pos| children[pos].1)
    }

    fn get(&self, key: &str) -> Option<IndexEntry> {
        let mut node = 0;
        for byte in key.bytes() {
            node = self.child(node, byte)?;
        }
        self.nodes[node].value
    }

    /// Inserts `key`, returning the entry it replaced.
    fn insert(&mut self, key: &str, entry: IndexEntry) -> Option<IndexEntry> {
        let mut node = 0;
        for byte in key.bytes() {
            node = match self.nodes[node]
                .children
                .binary_search_by_key(&byte, |&(b, _)| b)
            {
                Ok(pos) => self.nodes[node].children[pos].1,
                Err(pos) => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(pos, (byte, next));
                    next
                }
            };
        }
        let previous = self.nodes[node].value.replace(entry);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Clears `key`, returning its entry. Nodes are kept.
    fn remove(&mut self, key: &str) -> Option<IndexEntry> {
        let mut node = 0;
        for byte in key.bytes() {
            node = self.child(node, byte)?;
        }
        let previous = self.nodes[node].value.take();
        if previous.is_some() {
            self.len -= 1;
        }
        previous
    }

    /// Returns the entry for the longest key that is a prefix of `input`,
    /// with that key's byte length.
    fn longest_match(&self, input: &str) -> Option<(IndexEntry, usize)> {
        let mut node = 0;
        let mut best = self.nodes[0].value.map(|entry| (entry, 0));
        for (depth, byte) in input.bytes().enumerate() {
            match self.child(node, byte) {
                Some(next) => {
                    node = next;
                    if let Some(entry) = self.nodes[node].value {
                        best = Some((entry, depth + 1));
                    }
                }
                None => break,
            }
        }
        best
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY INDEX
// ═══════════════════════════════════════════════════════════════════════════════

/// Searchable record set with cross-record uniqueness of every prefix and
/// every URI prefix.
///
/// # Example
///
/// ```
/// use curies_registry::RegistryIndex;
/// use curies_types::Record;
///
/// let mut index = RegistryIndex::new();
/// index.insert(Record::new("obo", "http://purl.obolibrary.org/obo/")).unwrap();
/// index.insert(Record::new("doid", "http://purl.obolibrary.org/obo/DOID_")).unwrap();
///
/// let hit = index.longest_match("http://purl.obolibrary.org/obo/DOID_1234").unwrap();
/// assert_eq!(hit.record.prefix, "doid");
/// assert_eq!(hit.key_len, "http://purl.obolibrary.org/obo/DOID_".len());
/// ```
#[derive(Clone, Default)]
pub struct RegistryIndex {
    /// Records in insertion order, addressed by `RecordId`.
    records: Vec<Record>,
    /// Every prefix and prefix synonym.
    by_prefix: HashMap<String, IndexEntry>,
    /// Every URI prefix and URI prefix synonym.
    by_uri_prefix: UriTrie,
}

impl std::fmt::Debug for RegistryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryIndex")
            .field("records", &self.records.len())
            .field("by_prefix", &self.by_prefix.len())
            .field("by_uri_prefix", &self.by_uri_prefix.len)
            .field("trie_nodes", &self.by_uri_prefix.nodes.len())
            .finish()
    }
}

impl RegistryIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index with pre-allocated capacity for `record_count` records.
    pub fn with_capacity(record_count: usize) -> Self {
        Self {
            records: Vec::with_capacity(record_count),
            by_prefix: HashMap::with_capacity(record_count),
            by_uri_prefix: UriTrie::default(),
        }
    }

    /// Inserts a record.
    ///
    /// Fails with [`CurieError::DuplicateRecord`] if any of the record's
    /// prefixes or URI prefixes is already owned by a record with a different
    /// canonical mapping. Re-inserting an existing canonical mapping is a
    /// merge: new synonyms are added to the stored record and a missing
    /// pattern is adopted; an existing pattern is kept. On error the index
    /// is left unchanged.
    pub fn insert(&mut self, record: Record) -> CurieResult<InsertOutcome> {
        record.validate()?;
        let owner = self.owner_of(&record);
        self.check_conflicts(&record, owner)?;

        match owner {
            Some(id) => {
                self.merge(id, record);
                Ok(InsertOutcome::Merged(id))
            }
            None => Ok(InsertOutcome::Added(self.push(record))),
        }
    }

    /// Finds the record stored with the same canonical mapping as `record`.
    fn owner_of(&self, record: &Record) -> Option<RecordId> {
        let entry = self.by_prefix.get(&record.prefix)?;
        let existing = &self.records[entry.id.0];
        existing.same_mapping(record).then_some(entry.id)
    }

    fn check_conflicts(&self, record: &Record, owner: Option<RecordId>) -> CurieResult<()> {
        for prefix in record.all_prefixes() {
            if let Some(entry) = self.by_prefix.get(prefix) {
                if Some(entry.id) != owner {
                    return Err(self.duplicate(prefix, entry.id));
                }
            }
        }
        for uri_prefix in record.all_uri_prefixes() {
            if let Some(entry) = self.by_uri_prefix.get(uri_prefix) {
                if Some(entry.id) != owner {
                    return Err(self.duplicate(uri_prefix, entry.id));
                }
            }
        }
        Ok(())
    }

    fn duplicate(&self, value: &str, id: RecordId) -> CurieError {
        CurieError::DuplicateRecord {
            value: value.to_string(),
            existing: self.records[id.0].prefix.clone(),
        }
    }

    fn push(&mut self, record: Record) -> RecordId {
        let id = RecordId(self.records.len());
        debug!(prefix = %record.prefix, uri_prefix = %record.uri_prefix, "added record");
        self.records.push(record);
        self.index_keys(id);
        id
    }

    /// Points every key of the record stored under `id` at it.
    fn index_keys(&mut self, id: RecordId) {
        let record = &self.records[id.0];
        for prefix in record.all_prefixes() {
            let kind = if prefix == record.prefix {
                MatchKind::Canonical
            } else {
                MatchKind::Synonym
            };
            self.by_prefix
                .insert(prefix.to_string(), IndexEntry { id, kind });
        }
        for uri_prefix in record.all_uri_prefixes() {
            let kind = if uri_prefix == record.uri_prefix {
                MatchKind::Canonical
            } else {
                MatchKind::Synonym
            };
            self.by_uri_prefix.insert(uri_prefix, IndexEntry { id, kind });
        }
    }

    /// Replaces the record whose canonical prefix is `record.prefix`.
    ///
    /// Keys of the old record that the new one lacks are dropped. Fails with
    /// [`CurieError::PrefixNotFound`] if no record has that canonical prefix,
    /// and with [`CurieError::DuplicateRecord`] if a new key belongs to
    /// another record. On error the index is left unchanged.
    pub fn replace(&mut self, record: Record) -> CurieResult<RecordId> {
        record.validate()?;
        let id = self
            .by_prefix
            .get(&record.prefix)
            .filter(|entry| entry.kind == MatchKind::Canonical)
            .map(|entry| entry.id)
            .ok_or_else(|| CurieError::PrefixNotFound {
                prefix: record.prefix.clone(),
            })?;
        self.check_conflicts(&record, Some(id))?;

        let old = std::mem::replace(&mut self.records[id.0], record);
        for prefix in old.all_prefixes() {
            self.by_prefix.remove(prefix);
        }
        for uri_prefix in old.all_uri_prefixes() {
            self.by_uri_prefix.remove(uri_prefix);
        }
        self.index_keys(id);
        debug!(prefix = %old.prefix, "replaced record");
        Ok(id)
    }

    fn merge(&mut self, id: RecordId, record: Record) {
        let entry = IndexEntry {
            id,
            kind: MatchKind::Synonym,
        };
        let mut added = 0;
        for synonym in record.prefix_synonyms {
            if !self.by_prefix.contains_key(&synonym) {
                self.by_prefix.insert(synonym.clone(), entry);
                self.records[id.0].prefix_synonyms.insert(synonym);
                added += 1;
            }
        }
        for synonym in record.uri_prefix_synonyms {
            if self.by_uri_prefix.get(&synonym).is_none() {
                self.by_uri_prefix.insert(&synonym, entry);
                self.records[id.0].uri_prefix_synonyms.insert(synonym);
                added += 1;
            }
        }
        let stored = &mut self.records[id.0];
        if stored.pattern.is_none() {
            stored.pattern = record.pattern;
        }
        debug!(prefix = %stored.prefix, added_synonyms = added, "merged record");
    }

    fn resolve(&self, entry: IndexEntry, key_len: usize) -> Option<Lookup<'_>> {
        self.records.get(entry.id.0).map(|record| Lookup {
            id: entry.id,
            kind: entry.kind,
            record,
            key_len,
        })
    }

    /// Looks up a prefix (canonical or synonym).
    pub fn lookup_prefix(&self, prefix: &str) -> Option<Lookup<'_>> {
        let entry = *self.by_prefix.get(prefix)?;
        self.resolve(entry, prefix.len())
    }

    /// Looks up an exact URI prefix (canonical or synonym).
    pub fn lookup_uri_prefix(&self, uri_prefix: &str) -> Option<Lookup<'_>> {
        let entry = self.by_uri_prefix.get(uri_prefix)?;
        self.resolve(entry, uri_prefix.len())
    }

    /// Finds the record whose URI prefix (canonical or synonym) is the
    /// longest literal prefix of `uri`.
    pub fn longest_match(&self, uri: &str) -> Option<Lookup<'_>> {
        let (entry, key_len) = self.by_uri_prefix.longest_match(uri)?;
        self.resolve(entry, key_len)
    }

    /// Returns the record stored under `id`.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.0)
    }

    /// Returns all records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of indexed prefixes, synonyms included.
    pub fn prefix_count(&self) -> usize {
        self.by_prefix.len()
    }

    /// Returns the number of indexed URI prefixes, synonyms included.
    pub fn uri_prefix_count(&self) -> usize {
        self.by_uri_prefix.len
    }
}
