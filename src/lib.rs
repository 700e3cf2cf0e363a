//! foliodb: an embedded BSON document store with a scripted query harness.
//!
//! The store side holds named in-memory collections of BSON documents with
//! typed filters, updates, aggregation pipelines, and secondary indexes.
//! The harness side (catalog, executor, runner) walks a fixed, ordered list
//! of operation descriptors against one collection and reports the outcome
//! of each.

pub mod aggregate;
pub mod bookstore;
pub mod bsonpath;
pub mod catalog;
pub mod collection;
pub mod document;
pub mod errors;
pub mod executor;
pub mod index;
pub mod logger;
pub mod query;
pub mod runner;
pub mod types;

use crate::collection::Collection;
use crate::document::Document;
use crate::errors::DbError;
use crate::types::{CollectionName, DocumentId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// The main database struct: a set of named in-memory collections.
#[derive(Default)]
pub struct Database {
    collections: RwLock<HashMap<CollectionName, Arc<Collection>>>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets or creates the named collection.
    pub fn create_collection(&self, name: &str) -> Arc<Collection> {
        let mut cols = self.collections.write();
        cols.entry(name.to_string())
            .or_insert_with(|| Arc::new(Collection::new(name.to_string())))
            .clone()
    }

    pub fn get_collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    /// Like [`Database::get_collection`] but treats absence as a store
    /// failure, for callers that require the collection to exist.
    pub fn collection(&self, name: &str) -> Result<Arc<Collection>, DbError> {
        self.get_collection(name).ok_or_else(|| DbError::NoSuchCollection(name.to_string()))
    }

    pub fn drop_collection(&self, name: &str) -> bool {
        self.collections.write().remove(name).is_some()
    }

    pub fn list_collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    // --- Query API (façade over query/aggregate modules) ---

    pub fn insert_document(
        &self,
        collection_name: &str,
        document: Document,
    ) -> Result<DocumentId, DbError> {
        Ok(self.collection(collection_name)?.insert_document(document))
    }

    pub fn find(
        &self,
        collection_name: &str,
        filter: &query::Filter,
        opts: &query::FindOptions,
    ) -> Result<Vec<bson::Document>, DbError> {
        Ok(query::find_docs(&*self.collection(collection_name)?, filter, opts))
    }

    pub fn update_one(
        &self,
        collection_name: &str,
        filter: &query::Filter,
        update: &query::UpdateDoc,
    ) -> Result<query::UpdateReport, DbError> {
        Ok(query::update_one(&*self.collection(collection_name)?, filter, update))
    }

    pub fn delete_one(
        &self,
        collection_name: &str,
        filter: &query::Filter,
    ) -> Result<query::DeleteReport, DbError> {
        Ok(query::delete_one(&*self.collection(collection_name)?, filter))
    }

    pub fn aggregate(
        &self,
        collection_name: &str,
        pipeline: &aggregate::Pipeline,
    ) -> Result<Vec<bson::Document>, DbError> {
        aggregate::run_pipeline(&*self.collection(collection_name)?, pipeline)
    }

    pub fn create_index(
        &self,
        collection_name: &str,
        keys: &index::IndexKeys,
    ) -> Result<String, DbError> {
        Ok(self.collection(collection_name)?.create_index(keys))
    }
}
