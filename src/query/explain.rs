use serde::{Deserialize, Serialize};

use super::exec;
use super::types::{Filter, FindOptions};
use crate::collection::Collection;

/// Execution statistics for a find, in place of its result documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainReport {
    pub docs_examined: u64,
    pub n_returned: u64,
    /// Name of the index the scan went through, if any.
    pub index_used: Option<String>,
    pub duration_ms: u64,
}

/// Runs the find with instrumentation enabled and reports what it did.
pub fn explain_find(col: &Collection, filter: &Filter, opts: &FindOptions) -> ExplainReport {
    let started = std::time::Instant::now();
    let (docs, stats) = exec::run_find(col, filter, opts);
    ExplainReport {
        docs_examined: u64::try_from(stats.docs_examined).unwrap_or(u64::MAX),
        n_returned: u64::try_from(docs.len()).unwrap_or(u64::MAX),
        index_used: stats.index_used,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
