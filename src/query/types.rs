use bson::Bson;
use serde::{Deserialize, Serialize};

// Safety caps against degenerate specifications
pub(crate) const MAX_SORT_KEYS: usize = 8;
pub(crate) const HARD_RESULT_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: &str, order: Order) -> Self {
        Self { field: field.to_string(), order }
    }
}

/// Which fields a find returns. Listed fields are copied in order; the
/// synthetic `_id` field rides along unless explicitly excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub fields: Vec<String>,
    pub include_id: bool,
}

impl Projection {
    #[must_use]
    pub fn fields(fields: &[&str]) -> Self {
        Self { fields: fields.iter().map(|f| (*f).to_string()).collect(), include_id: true }
    }

    /// Same as [`Projection::fields`] but with `_id` suppressed.
    #[must_use]
    pub fn without_id(fields: &[&str]) -> Self {
        Self { fields: fields.iter().map(|f| (*f).to_string()).collect(), include_id: false }
    }
}

/// Immutable find specification: built once, consumed by the executor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindOptions {
    pub projection: Option<Projection>,
    pub sort: Option<Vec<SortSpec>>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl FindOptions {
    #[must_use]
    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Appends a sort key; earlier keys take precedence.
    #[must_use]
    pub fn sorted_by(mut self, field: &str, order: Order) -> Self {
        self.sort.get_or_insert_with(Vec::new).push(SortSpec::new(field, order));
        self
    }

    #[must_use]
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(n);
        self
    }

    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
pub enum Filter {
    /// Matches every document (the empty filter).
    All,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Exists { path: String, exists: bool },
    In { path: String, values: Vec<Bson> },
    Cmp { path: String, op: CmpOp, value: Bson },
}

impl Filter {
    #[must_use]
    pub fn eq(path: &str, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.to_string(), op: CmpOp::Eq, value: value.into() }
    }

    #[must_use]
    pub fn gt(path: &str, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.to_string(), op: CmpOp::Gt, value: value.into() }
    }

    #[must_use]
    pub fn gte(path: &str, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.to_string(), op: CmpOp::Gte, value: value.into() }
    }

    #[must_use]
    pub fn lt(path: &str, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.to_string(), op: CmpOp::Lt, value: value.into() }
    }

    #[must_use]
    pub fn lte(path: &str, value: impl Into<Bson>) -> Self {
        Self::Cmp { path: path.to_string(), op: CmpOp::Lte, value: value.into() }
    }
}

/// `$set` / `$inc` / `$unset` update operators, applied in that order.
#[derive(Debug, Default, Clone)]
pub struct UpdateDoc {
    pub set: Vec<(String, Bson)>,
    pub inc: Vec<(String, f64)>,
    pub unset: Vec<String>,
}

impl UpdateDoc {
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Bson>) -> Self {
        self.set.push((path.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn inc(mut self, path: &str, by: f64) -> Self {
        self.inc.push((path.to_string(), by));
        self
    }

    #[must_use]
    pub fn unset(mut self, path: &str) -> Self {
        self.unset.push(path.to_string());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.inc.is_empty() && self.unset.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub deleted: u64,
}
