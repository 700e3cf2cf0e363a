use super::core::Collection;
use crate::document::Document;
use crate::index::{index_insert_all, index_remove_all};
use crate::types::DocumentId;

impl Collection {
    pub fn insert_document(&self, document: Document) -> DocumentId {
        let id = document.id.clone();
        {
            let mut st = self.store.write();
            st.order.push(id.clone());
            st.docs.insert(id.clone(), document.clone());
        }
        index_insert_all(&mut self.indexes.write(), &document.data, &id);
        log::debug!("insert collection={} id={id}", self.name_str());
        id
    }

    pub fn find_document(&self, id: &DocumentId) -> Option<Document> {
        self.store.read().docs.get(id).cloned()
    }

    /// Replaces the document body under an existing id. Returns false when
    /// the id is unknown.
    pub fn update_document(&self, id: &DocumentId, new_document: Document) -> bool {
        let old = {
            let st = self.store.read();
            match st.docs.get(id) {
                Some(d) => d.clone(),
                None => return false,
            }
        };
        let mut replacement = new_document;
        replacement.id = id.clone();
        {
            let mut st = self.store.write();
            st.docs.insert(id.clone(), replacement.clone());
        }
        let mut mgr = self.indexes.write();
        index_remove_all(&mut mgr, &old.data, id);
        index_insert_all(&mut mgr, &replacement.data, id);
        log::debug!("update collection={} id={id}", self.name_str());
        true
    }

    pub fn delete_document(&self, id: &DocumentId) -> bool {
        let old = {
            let mut st = self.store.write();
            match st.docs.remove(id) {
                Some(d) => {
                    st.order.retain(|x| x != id);
                    d
                }
                None => return false,
            }
        };
        index_remove_all(&mut self.indexes.write(), &old.data, id);
        log::debug!("delete collection={} id={id}", self.name_str());
        true
    }

    /// Document ids in insertion order.
    pub fn list_ids(&self) -> Vec<DocumentId> {
        self.store.read().order.clone()
    }

    /// All documents in insertion order.
    pub fn get_all_documents(&self) -> Vec<Document> {
        let st = self.store.read();
        st.order.iter().filter_map(|id| st.docs.get(id).cloned()).collect()
    }
}
