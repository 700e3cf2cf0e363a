use bson::{Bson, Document as BsonDocument};
use ordered_float::OrderedFloat;
use std::collections::HashMap;

use super::stage::{Accumulator, Expr, Pipeline, ProjectField, Stage};
use crate::bsonpath;
use crate::collection::Collection;
use crate::errors::DbError;
use crate::query::{self, as_f64, compare_docs};

/// Runs the pipeline over every document body in the collection, stage by
/// stage, and returns the surviving documents in pipeline-determined order.
pub fn run_pipeline(col: &Collection, pipeline: &Pipeline) -> Result<Vec<BsonDocument>, DbError> {
    if pipeline.is_empty() {
        return Err(DbError::MalformedPayload("aggregation pipeline has no stages".into()));
    }
    let mut docs: Vec<BsonDocument> =
        col.get_all_documents().into_iter().map(|d| d.data).collect();
    for stage in &pipeline.stages {
        docs = apply_stage(docs, stage)?;
    }
    log::debug!(
        "aggregate collection={} stages={} returned={}",
        col.name_str(),
        pipeline.len(),
        docs.len()
    );
    Ok(docs)
}

fn apply_stage(docs: Vec<BsonDocument>, stage: &Stage) -> Result<Vec<BsonDocument>, DbError> {
    match stage {
        Stage::Group { key, fields } => apply_group(docs, key, fields),
        Stage::Sort(keys) => {
            let mut docs = docs;
            docs.sort_by(|a, b| compare_docs(a, b, keys));
            Ok(docs)
        }
        Stage::Limit(n) => {
            let mut docs = docs;
            docs.truncate(*n);
            Ok(docs)
        }
        Stage::Project(fields) => apply_project(&docs, fields),
    }
}

fn apply_group(
    docs: Vec<BsonDocument>,
    key: &Expr,
    fields: &[(String, Accumulator)],
) -> Result<Vec<BsonDocument>, DbError> {
    // Buckets come out in first-seen order; a $sort stage usually follows.
    let mut order: Vec<GroupKey> = Vec::new();
    let mut buckets: HashMap<GroupKey, Vec<BsonDocument>> = HashMap::new();
    for doc in docs {
        let k = GroupKey::from_bson(eval_expr(&doc, key)?)?;
        if !buckets.contains_key(&k) {
            order.push(k.clone());
        }
        buckets.entry(k).or_default().push(doc);
    }
    let mut out = Vec::with_capacity(order.len());
    for k in order {
        let members = &buckets[&k];
        let mut g = BsonDocument::new();
        g.insert("_id", k.to_bson());
        for (name, acc) in fields {
            g.insert(name.clone(), eval_accumulator(members, acc)?);
        }
        out.push(g);
    }
    Ok(out)
}

fn apply_project(
    docs: &[BsonDocument],
    fields: &[(String, ProjectField)],
) -> Result<Vec<BsonDocument>, DbError> {
    let id_mentioned = fields.iter().any(|(f, _)| f == "_id");
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        let mut shaped = BsonDocument::new();
        // _id survives unless explicitly excluded
        if !id_mentioned && let Some(v) = doc.get("_id") {
            shaped.insert("_id", v.clone());
        }
        for (field, pf) in fields {
            match pf {
                ProjectField::Include => {
                    if let Some(v) = bsonpath::get(doc, field) {
                        shaped.insert(field.clone(), v.clone());
                    }
                }
                ProjectField::Exclude => {}
                ProjectField::Computed(expr) => {
                    shaped.insert(field.clone(), eval_expr(doc, expr)?);
                }
            }
        }
        out.push(shaped);
    }
    Ok(out)
}

fn eval_accumulator(members: &[BsonDocument], acc: &Accumulator) -> Result<Bson, DbError> {
    match acc {
        Accumulator::Avg(expr) => {
            let nums = numeric_values(members, expr)?;
            if nums.is_empty() {
                return Ok(Bson::Null);
            }
            #[allow(clippy::cast_precision_loss)]
            let mean = nums.iter().sum::<f64>() / nums.len() as f64;
            Ok(Bson::Double(mean))
        }
        Accumulator::Sum(expr) => {
            let mut total = 0.0;
            let mut integral = true;
            for doc in members {
                match eval_expr(doc, expr)? {
                    Bson::Int32(i) => total += f64::from(i),
                    #[allow(clippy::cast_precision_loss)]
                    Bson::Int64(i) => total += i as f64,
                    Bson::Double(f) => {
                        total += f;
                        integral = false;
                    }
                    // non-numeric values do not contribute
                    _ => {}
                }
            }
            if integral && total.fract() == 0.0 {
                #[allow(clippy::cast_possible_truncation)]
                let n = total as i64;
                Ok(Bson::Int64(n))
            } else {
                Ok(Bson::Double(total))
            }
        }
        Accumulator::Min(expr) => extremum(members, expr, std::cmp::Ordering::Less),
        Accumulator::Max(expr) => extremum(members, expr, std::cmp::Ordering::Greater),
    }
}

fn extremum(
    members: &[BsonDocument],
    expr: &Expr,
    keep: std::cmp::Ordering,
) -> Result<Bson, DbError> {
    let mut best: Option<Bson> = None;
    for doc in members {
        let v = eval_expr(doc, expr)?;
        if matches!(v, Bson::Null) {
            continue;
        }
        best = match best {
            None => Some(v),
            Some(cur) if query::compare_bson(&v, &cur) == keep => Some(v),
            Some(cur) => Some(cur),
        };
    }
    Ok(best.unwrap_or(Bson::Null))
}

fn numeric_values(members: &[BsonDocument], expr: &Expr) -> Result<Vec<f64>, DbError> {
    let mut out = Vec::with_capacity(members.len());
    for doc in members {
        if let Some(f) = as_f64(&eval_expr(doc, expr)?) {
            out.push(f);
        }
    }
    Ok(out)
}

fn eval_expr(doc: &BsonDocument, expr: &Expr) -> Result<Bson, DbError> {
    match expr {
        Expr::Field(path) => Ok(bsonpath::get(doc, path).cloned().unwrap_or(Bson::Null)),
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Floor(inner) => {
            let v = eval_expr(doc, inner)?;
            match as_f64(&v) {
                Some(f) => Ok(Bson::Double(f.floor())),
                None if matches!(v, Bson::Null) => Ok(Bson::Null),
                None => Err(DbError::QueryError(format!("$floor: non-numeric value {v:?}"))),
            }
        }
        Expr::Divide(num, den) => {
            let n = require_number(doc, num, "$divide")?;
            let d = require_number(doc, den, "$divide")?;
            if d == 0.0 {
                return Err(DbError::QueryError("$divide: division by zero".into()));
            }
            Ok(Bson::Double(n / d))
        }
        Expr::Multiply(a, b) => {
            let x = require_number(doc, a, "$multiply")?;
            let y = require_number(doc, b, "$multiply")?;
            Ok(Bson::Double(x * y))
        }
        Expr::Concat(parts) => {
            let mut s = String::new();
            for part in parts {
                match eval_expr(doc, part)? {
                    Bson::String(piece) => s.push_str(&piece),
                    Bson::Null => return Ok(Bson::Null),
                    other => {
                        return Err(DbError::QueryError(format!(
                            "$concat: non-string value {other:?}"
                        )));
                    }
                }
            }
            Ok(Bson::String(s))
        }
        Expr::Stringify(inner) => stringify(&eval_expr(doc, inner)?),
    }
}

fn require_number(doc: &BsonDocument, expr: &Expr, op: &str) -> Result<f64, DbError> {
    let v = eval_expr(doc, expr)?;
    as_f64(&v).ok_or_else(|| DbError::QueryError(format!("{op}: non-numeric value {v:?}")))
}

fn stringify(v: &Bson) -> Result<Bson, DbError> {
    Ok(match v {
        Bson::String(s) => Bson::String(s.clone()),
        Bson::Int32(i) => Bson::String(i.to_string()),
        Bson::Int64(i) => Bson::String(i.to_string()),
        Bson::Boolean(b) => Bson::String(b.to_string()),
        #[allow(clippy::cast_possible_truncation)]
        Bson::Double(f) if f.is_finite() && f.fract() == 0.0 => {
            Bson::String((*f as i64).to_string())
        }
        Bson::Double(f) => Bson::String(f.to_string()),
        Bson::Null => Bson::Null,
        other => {
            return Err(DbError::QueryError(format!("$toString: unsupported value {other:?}")));
        }
    })
}

/// Hashable stand-in for a scalar bucket key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
}

impl GroupKey {
    fn from_bson(v: Bson) -> Result<Self, DbError> {
        Ok(match v {
            Bson::Null => Self::Null,
            Bson::Boolean(b) => Self::Bool(b),
            Bson::Int32(i) => Self::Int(i64::from(i)),
            Bson::Int64(i) => Self::Int(i),
            Bson::Double(f) => Self::Float(OrderedFloat(f)),
            Bson::String(s) => Self::Str(s),
            other => {
                return Err(DbError::QueryError(format!(
                    "$group: unsupported key value {other:?}"
                )));
            }
        })
    }

    fn to_bson(&self) -> Bson {
        match self {
            Self::Null => Bson::Null,
            Self::Bool(b) => Bson::Boolean(*b),
            Self::Int(i) => Bson::Int64(*i),
            Self::Float(f) => Bson::Double(f.0),
            Self::Str(s) => Bson::String(s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::query::{Order, SortSpec};
    use bson::doc;

    fn seed(col: &Collection, docs: Vec<BsonDocument>) {
        for d in docs {
            col.insert_document(Document::new(d));
        }
    }

    #[test]
    fn empty_pipeline_is_malformed() {
        let col = Collection::new("books".into());
        let err = run_pipeline(&col, &Pipeline::new()).unwrap_err();
        assert!(matches!(err, DbError::MalformedPayload(_)));
    }

    #[test]
    fn group_avg_by_field() {
        let col = Collection::new("books".into());
        seed(
            &col,
            vec![
                doc! {"genre": "Fiction", "price": 10.0},
                doc! {"genre": "Fiction", "price": 14.0},
                doc! {"genre": "Fantasy", "price": 20.0},
            ],
        );
        let pipeline = Pipeline::new().group(
            Expr::field("genre"),
            vec![("avgPrice", Accumulator::Avg(Expr::field("price")))],
        );
        let out = run_pipeline(&col, &pipeline).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get_str("_id").unwrap(), "Fiction");
        assert_eq!(out[0].get_f64("avgPrice").unwrap(), 12.0);
        assert_eq!(out[1].get_f64("avgPrice").unwrap(), 20.0);
    }

    #[test]
    fn sum_of_literal_one_counts_documents() {
        let col = Collection::new("books".into());
        seed(&col, vec![doc! {"a": 1}, doc! {"a": 2}, doc! {"a": 3}]);
        let pipeline = Pipeline::new().group(
            Expr::lit(Bson::Null),
            vec![("total", Accumulator::Sum(Expr::lit(1)))],
        );
        let out = run_pipeline(&col, &pipeline).unwrap();
        assert_eq!(out[0].get_i64("total").unwrap(), 3);
    }

    #[test]
    fn min_max_over_group() {
        let col = Collection::new("books".into());
        seed(&col, vec![doc! {"p": 3.0}, doc! {"p": 1.0}, doc! {"p": 2.0}]);
        let pipeline = Pipeline::new().group(
            Expr::lit("all"),
            vec![
                ("lo", Accumulator::Min(Expr::field("p"))),
                ("hi", Accumulator::Max(Expr::field("p"))),
            ],
        );
        let out = run_pipeline(&col, &pipeline).unwrap();
        assert_eq!(out[0].get_f64("lo").unwrap(), 1.0);
        assert_eq!(out[0].get_f64("hi").unwrap(), 3.0);
    }

    #[test]
    fn project_computes_and_drops_id() {
        let col = Collection::new("books".into());
        seed(&col, vec![doc! {"year": 1994}]);
        let pipeline = Pipeline::new().project(vec![
            (
                "label",
                ProjectField::Computed(Expr::concat(vec![
                    Expr::stringify(Expr::field("year")),
                    Expr::lit("s"),
                ])),
            ),
            ("_id", ProjectField::Exclude),
        ]);
        let out = run_pipeline(&col, &pipeline).unwrap();
        assert_eq!(out[0], doc! {"label": "1994s"});
    }

    #[test]
    fn divide_by_zero_is_a_query_error() {
        let col = Collection::new("books".into());
        seed(&col, vec![doc! {"a": 1}]);
        let pipeline = Pipeline::new().project(vec![(
            "bad",
            ProjectField::Computed(Expr::divide(Expr::field("a"), Expr::lit(0))),
        )]);
        assert!(matches!(run_pipeline(&col, &pipeline), Err(DbError::QueryError(_))));
    }

    #[test]
    fn sort_stage_orders_buckets() {
        let col = Collection::new("books".into());
        seed(&col, vec![doc! {"g": "b"}, doc! {"g": "a"}, doc! {"g": "b"}]);
        let pipeline = Pipeline::new()
            .group(Expr::field("g"), vec![("n", Accumulator::Sum(Expr::lit(1)))])
            .sort(vec![SortSpec::new("n", Order::Desc)]);
        let out = run_pipeline(&col, &pipeline).unwrap();
        assert_eq!(out[0].get_str("_id").unwrap(), "b");
        assert_eq!(out[0].get_i64("n").unwrap(), 2);
    }
}
