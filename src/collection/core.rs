use crate::document::Document;
use crate::index::IndexManager;
use crate::types::DocumentId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory, insertion-ordered set of BSON documents.
///
/// The insertion order is the collection's natural order: unsorted scans,
/// and therefore skip/limit pagination without an explicit sort, walk
/// documents in the order they were inserted.
pub struct Collection {
    pub name: RwLock<String>,
    pub(crate) store: RwLock<Store>,
    pub indexes: RwLock<IndexManager>,
}

#[derive(Default)]
pub(crate) struct Store {
    pub docs: HashMap<DocumentId, Document>,
    pub order: Vec<DocumentId>,
}

impl Collection {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name: RwLock::new(name),
            store: RwLock::new(Store::default()),
            indexes: RwLock::new(IndexManager::new()),
        }
    }

    /// Returns the collection's name as a String (cloned), hiding the `RwLock`.
    pub fn name_str(&self) -> String {
        self.name.read().clone()
    }

    pub fn len(&self) -> usize {
        self.store.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
