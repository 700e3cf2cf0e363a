use bson::{Bson, Document as BsonDocument};
use std::collections::HashSet;

use super::eval::{as_f64, compare_docs, eval_filter, render_output};
use super::types::{
    CmpOp, DeleteReport, Filter, FindOptions, HARD_RESULT_LIMIT, MAX_SORT_KEYS, UpdateDoc,
    UpdateReport,
};
use crate::bsonpath;
use crate::collection::Collection;
use crate::document::Document;
use crate::types::DocumentId;

/// What a find touched, for `explain`.
#[derive(Debug, Default, Clone)]
pub(crate) struct FindStats {
    pub docs_examined: usize,
    pub index_used: Option<String>,
}

/// Runs a find and returns the wire-form documents. The base order is the
/// collection's insertion order; only the options' sort reorders it.
pub fn find_docs(col: &Collection, filter: &Filter, opts: &FindOptions) -> Vec<BsonDocument> {
    run_find(col, filter, opts).0
}

pub(crate) fn run_find(
    col: &Collection,
    filter: &Filter,
    opts: &FindOptions,
) -> (Vec<BsonDocument>, FindStats) {
    let (mut docs, stats) = scan(col, filter);

    if let Some(sort) = &opts.sort {
        if sort.len() > MAX_SORT_KEYS {
            log::warn!("sort spec too long, ignoring keys beyond {MAX_SORT_KEYS}");
        }
        let keys = &sort[..sort.len().min(MAX_SORT_KEYS)];
        docs.sort_by(|a, b| compare_docs(&a.data, &b.data, keys));
    }

    let skip = opts.skip.unwrap_or(0);
    let limit = opts.limit.unwrap_or(usize::MAX).min(HARD_RESULT_LIMIT);
    let out: Vec<BsonDocument> = docs
        .into_iter()
        .skip(skip)
        .take(limit)
        .map(|d| render_output(&d, opts.projection.as_ref()))
        .collect();

    log::debug!(
        "find collection={} examined={} returned={} index={:?}",
        col.name_str(),
        stats.docs_examined,
        out.len(),
        stats.index_used
    );
    (out, stats)
}

/// Updates the first matching document, in insertion order. A zero matched
/// count means nothing matched; it is a condition, not an error.
pub fn update_one(col: &Collection, filter: &Filter, update: &UpdateDoc) -> UpdateReport {
    for id in col.list_ids() {
        if let Some(mut doc) = col.find_document(&id)
            && eval_filter(&doc.data, filter)
        {
            let changed = apply_update(&mut doc, update);
            if changed {
                doc.updated_at = chrono::Utc::now();
            }
            col.update_document(&id, doc);
            return UpdateReport { matched: 1, modified: u64::from(changed) };
        }
    }
    UpdateReport::default()
}

/// Deletes the first matching document, in insertion order.
pub fn delete_one(col: &Collection, filter: &Filter) -> DeleteReport {
    for id in col.list_ids() {
        if let Some(doc) = col.find_document(&id)
            && eval_filter(&doc.data, filter)
        {
            return DeleteReport { deleted: u64::from(col.delete_document(&id)) };
        }
    }
    DeleteReport::default()
}

/// Applies `$set`, `$inc`, then `$unset` to the document body. Returns
/// whether anything changed.
pub fn apply_update(doc: &mut Document, upd: &UpdateDoc) -> bool {
    let mut changed = false;
    for (path, value) in &upd.set {
        changed |= bsonpath::set(&mut doc.data, path, value.clone());
    }
    for (path, by) in &upd.inc {
        let cur = bsonpath::get(&doc.data, path).and_then(as_f64).unwrap_or(0.0);
        changed |= bsonpath::set(&mut doc.data, path, Bson::Double(cur + by));
    }
    for path in &upd.unset {
        changed |= bsonpath::unset(&mut doc.data, path);
    }
    changed
}

/// Filters the collection, probing a single-field index for top-level
/// equality when one exists. Results come back in insertion order either way.
fn scan(col: &Collection, filter: &Filter) -> (Vec<Document>, FindStats) {
    let mut stats = FindStats::default();
    let ids: Vec<DocumentId> = match index_candidates(col, filter) {
        Some((name, candidates)) => {
            stats.index_used = Some(name);
            let set: HashSet<DocumentId> = candidates.into_iter().collect();
            col.list_ids().into_iter().filter(|id| set.contains(id)).collect()
        }
        None => col.list_ids(),
    };
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(d) = col.find_document(&id) {
            stats.docs_examined += 1;
            if eval_filter(&d.data, filter) {
                out.push(d);
            }
        }
    }
    (out, stats)
}

fn index_candidates(col: &Collection, filter: &Filter) -> Option<(String, Vec<DocumentId>)> {
    match filter {
        Filter::Cmp { path, op: CmpOp::Eq, value } => {
            let mut mgr = col.indexes.write();
            let name = mgr.eq_candidate(path)?;
            let ids = mgr.get_mut(&name)?.lookup_eq(value).unwrap_or_default();
            Some((name, ids))
        }
        Filter::And(fs) => fs.iter().find_map(|f| index_candidates(col, f)),
        _ => None,
    }
}
