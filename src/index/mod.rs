//! Secondary indexes over collection documents.
//!
//! An index is declared by an ordered key spec (field, direction). Entries
//! are kept in a `BTreeMap` keyed by the extracted field values, so equality
//! lookups and ordered scans both come for free. Creation is idempotent:
//! declaring an index whose key spec already exists reuses the existing one.

use crate::bsonpath;
use crate::types::DocumentId;
use bson::{Bson, Document as BsonDocument};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// The wire-format spelling: `1` ascending, `-1` descending.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Ordered (field, direction) pairs declaring an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexKeys(Vec<(String, Direction)>);

impl IndexKeys {
    #[must_use]
    pub fn single(field: &str, direction: Direction) -> Self {
        Self(vec![(field.to_string(), direction)])
    }

    #[must_use]
    pub fn compound(fields: &[(&str, Direction)]) -> Self {
        Self(fields.iter().map(|(f, d)| ((*f).to_string(), *d)).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.0
    }

    /// Index name in the `field_1` / `a_1_b_-1` convention.
    #[must_use]
    pub fn name(&self) -> String {
        self.0
            .iter()
            .map(|(f, d)| format!("{f}_{}", d.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Hashable, ordered stand-in for one indexed BSON value. Missing fields
/// index as `Null`, like sparse-less Mongo indexes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyPart {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

impl KeyPart {
    #[must_use]
    pub fn from_bson(v: Option<&Bson>) -> Self {
        match v {
            Some(Bson::Boolean(b)) => Self::Bool(*b),
            Some(Bson::Int32(i)) => Self::Int(i64::from(*i)),
            Some(Bson::Int64(i)) => Self::Int(*i),
            Some(Bson::Double(f)) => Self::Float(OrderedFloat(*f)),
            Some(Bson::String(s)) => Self::Str(s.clone()),
            _ => Self::Null,
        }
    }
}

pub type CompositeKey = Vec<KeyPart>;

#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub keys: usize,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub build_time_ms: u128,
}

#[derive(Debug, Clone)]
pub struct Index {
    pub keys: IndexKeys,
    pub entries: BTreeMap<CompositeKey, BTreeSet<DocumentId>>,
    pub stats: IndexStats,
}

impl Index {
    #[must_use]
    pub fn new(keys: IndexKeys) -> Self {
        Self { keys, entries: BTreeMap::new(), stats: IndexStats::default() }
    }

    fn composite_key(&self, doc: &BsonDocument) -> CompositeKey {
        self.keys.fields().iter().map(|(f, _)| KeyPart::from_bson(bsonpath::get(doc, f))).collect()
    }

    pub fn insert(&mut self, doc: &BsonDocument, id: &DocumentId) {
        let key = self.composite_key(doc);
        let set = self.entries.entry(key).or_default();
        if set.insert(id.clone()) {
            self.stats.entries += 1;
        }
        self.stats.keys = self.entries.len();
    }

    pub fn remove(&mut self, doc: &BsonDocument, id: &DocumentId) {
        let key = self.composite_key(doc);
        if let Some(set) = self.entries.get_mut(&key) {
            if set.remove(id) {
                self.stats.entries = self.stats.entries.saturating_sub(1);
            }
            if set.is_empty() {
                self.entries.remove(&key);
            }
        }
        self.stats.keys = self.entries.len();
    }

    /// Equality lookup; only meaningful for single-field indexes.
    pub fn lookup_eq(&mut self, value: &Bson) -> Option<Vec<DocumentId>> {
        let key = vec![KeyPart::from_bson(Some(value))];
        if let Some(set) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Some(set.iter().cloned().collect());
        }
        self.stats.misses += 1;
        None
    }
}

#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: HashMap<String, Index>,
}

impl IndexManager {
    #[must_use]
    pub fn new() -> Self {
        Self { indexes: HashMap::new() }
    }

    /// Registers an empty index for `keys` and returns its name. Callers are
    /// expected to check `find_matching` first and backfill existing
    /// documents afterwards.
    pub fn create_index(&mut self, keys: IndexKeys) -> String {
        let name = keys.name();
        self.indexes.entry(name.clone()).or_insert_with(|| Index::new(keys));
        name
    }

    #[must_use]
    pub fn find_matching(&self, keys: &IndexKeys) -> Option<String> {
        self.indexes.values().find(|idx| &idx.keys == keys).map(|idx| idx.keys.name())
    }

    pub fn drop_index(&mut self, name: &str) -> bool {
        self.indexes.remove(name).is_some()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indexes.keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Index> {
        self.indexes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Index> {
        self.indexes.get_mut(name)
    }

    /// Name of a single-field index usable for an equality probe on `path`.
    #[must_use]
    pub fn eq_candidate(&self, path: &str) -> Option<String> {
        self.indexes
            .values()
            .find(|idx| {
                idx.keys.fields().len() == 1 && idx.keys.fields()[0].0 == path
            })
            .map(|idx| idx.keys.name())
    }
}

pub fn index_insert_all(mgr: &mut IndexManager, doc: &BsonDocument, id: &DocumentId) {
    for idx in mgr.indexes.values_mut() {
        idx.insert(doc, id);
    }
}

pub fn index_remove_all(mgr: &mut IndexManager, doc: &BsonDocument, id: &DocumentId) {
    for idx in mgr.indexes.values_mut() {
        idx.remove(doc, id);
    }
}

/// Equality probe through a single-field index on `path`, if one exists.
pub fn lookup_eq(mgr: &mut IndexManager, path: &str, value: &Bson) -> Option<Vec<DocumentId>> {
    let name = mgr.eq_candidate(path)?;
    mgr.get_mut(&name)?.lookup_eq(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn index_names_follow_key_spec() {
        assert_eq!(IndexKeys::single("title", Direction::Ascending).name(), "title_1");
        assert_eq!(
            IndexKeys::compound(&[
                ("author", Direction::Ascending),
                ("published_year", Direction::Descending)
            ])
            .name(),
            "author_1_published_year_-1"
        );
    }

    #[test]
    fn insert_remove_and_lookup() {
        let mut idx = Index::new(IndexKeys::single("title", Direction::Ascending));
        let id = DocumentId::new();
        idx.insert(&doc! {"title": "The Hobbit"}, &id);
        assert_eq!(idx.stats.entries, 1);
        let hits = idx.lookup_eq(&Bson::String("The Hobbit".into())).unwrap();
        assert_eq!(hits, vec![id.clone()]);
        assert!(idx.lookup_eq(&Bson::String("missing".into())).is_none());
        idx.remove(&doc! {"title": "The Hobbit"}, &id);
        assert_eq!(idx.stats.entries, 0);
    }

    #[test]
    fn manager_create_is_idempotent() {
        let mut mgr = IndexManager::new();
        let keys = IndexKeys::single("title", Direction::Ascending);
        let a = mgr.create_index(keys.clone());
        let b = mgr.create_index(keys.clone());
        assert_eq!(a, b);
        assert_eq!(mgr.names().len(), 1);
        assert_eq!(mgr.find_matching(&keys), Some("title_1".to_string()));
    }
}
