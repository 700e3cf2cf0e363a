use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::types::{CmpOp, Filter, Projection, SortSpec};
use crate::bsonpath;
use crate::document::Document;

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Or(fs) => fs.iter().any(|f| eval_filter(doc, f)),
        Filter::Not(f) => !eval_filter(doc, f),
        Filter::Exists { path, exists } => bsonpath::get(doc, path).is_some() == *exists,
        Filter::In { path, values } => {
            bsonpath::get(doc, path).is_some_and(|v| values.iter().any(|x| x == v))
        }
        Filter::Cmp { path, op, value } => {
            let Some(v) = bsonpath::get(doc, path) else {
                return false;
            };
            match op {
                CmpOp::Eq => v == value,
                CmpOp::Gt => compare_bson(v, value) == Ordering::Greater,
                CmpOp::Gte => compare_bson(v, value) != Ordering::Less,
                CmpOp::Lt => compare_bson(v, value) == Ordering::Less,
                CmpOp::Lte => compare_bson(v, value) != Ordering::Greater,
            }
        }
    }
}

/// Total order over BSON values: numerics compare across integer/double
/// representations, strings and booleans compare natively, everything else
/// falls back to a fixed type rank.
pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    if let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) {
        return x.total_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => x.cmp(y),
        (Bson::Boolean(x), Bson::Boolean(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Multi-key document comparison for sorting. Missing fields sort before
/// present ones.
pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort {
        let va = bsonpath::get(a, &s.field);
        let vb = bsonpath::get(b, &s.field);
        let ord = match (va, vb) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return match s.order {
                super::types::Order::Asc => ord,
                super::types::Order::Desc => ord.reverse(),
            };
        }
    }
    Ordering::Equal
}

pub(crate) fn as_f64(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::Null => 0,
        Bson::Boolean(_) => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 2,
        Bson::String(_) => 3,
        Bson::Array(_) => 4,
        Bson::Document(_) => 5,
        _ => 6,
    }
}

/// Shapes a stored document into its wire form: the synthetic `_id` first,
/// then either all body fields or the projected subset.
pub(crate) fn render_output(doc: &Document, projection: Option<&Projection>) -> BsonDocument {
    let mut out = BsonDocument::new();
    match projection {
        None => {
            out.insert("_id", doc.id.to_string());
            for (k, v) in doc.data.iter() {
                out.insert(k.to_string(), v.clone());
            }
        }
        Some(p) => {
            if p.include_id {
                out.insert("_id", doc.id.to_string());
            }
            for f in &p.fields {
                if let Some(v) = bsonpath::get(&doc.data, f) {
                    out.insert(f.clone(), v.clone());
                }
            }
        }
    }
    out
}
