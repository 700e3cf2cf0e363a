use super::core::Collection;
use crate::index::{IndexKeys, IndexStats};

impl Collection {
    /// Declares a secondary index and backfills it from current documents.
    /// Re-declaring an identical key spec is a no-op that returns the
    /// existing index's name.
    pub fn create_index(&self, keys: &IndexKeys) -> String {
        let mut mgr = self.indexes.write();
        if let Some(existing) = mgr.find_matching(keys) {
            log::debug!("index {existing} already exists on {}", self.name_str());
            return existing;
        }
        let name = mgr.create_index(keys.clone());
        let start = std::time::Instant::now();
        {
            let st = self.store.read();
            if let Some(idx) = mgr.get_mut(&name) {
                for id in &st.order {
                    if let Some(doc) = st.docs.get(id) {
                        idx.insert(&doc.data, id);
                    }
                }
            }
        }
        if let Some(idx) = mgr.get_mut(&name) {
            idx.stats.build_time_ms = start.elapsed().as_millis();
        }
        log::info!("built index {name} on {}", self.name_str());
        name
    }

    pub fn drop_index(&self, name: &str) -> bool {
        self.indexes.write().drop_index(name)
    }

    pub fn list_indexes(&self) -> Vec<String> {
        self.indexes.read().names()
    }

    pub fn index_stats(&self, name: &str) -> Option<IndexStats> {
        self.indexes.read().get(name).map(|idx| idx.stats.clone())
    }
}
