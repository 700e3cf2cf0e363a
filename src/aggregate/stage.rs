use bson::Bson;

use crate::query::SortSpec;

/// One step of an aggregation pipeline, applied in order.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Buckets documents by the key expression and reduces each bucket
    /// through the named accumulators. Output documents carry the bucket
    /// key as `_id`.
    Group { key: Expr, fields: Vec<(String, Accumulator)> },
    Sort(Vec<SortSpec>),
    Limit(usize),
    /// Reshapes each document: kept fields, computed fields, and an
    /// optional `_id` exclusion.
    Project(Vec<(String, ProjectField)>),
}

#[derive(Debug, Clone)]
pub enum ProjectField {
    Include,
    Exclude,
    Computed(Expr),
}

#[derive(Debug, Clone)]
pub enum Accumulator {
    Avg(Expr),
    Sum(Expr),
    Min(Expr),
    Max(Expr),
}

/// Value expression over a single document.
#[derive(Debug, Clone)]
pub enum Expr {
    Field(String),
    Literal(Bson),
    Floor(Box<Expr>),
    Divide(Box<Expr>, Box<Expr>),
    Multiply(Box<Expr>, Box<Expr>),
    Concat(Vec<Expr>),
    Stringify(Box<Expr>),
}

impl Expr {
    #[must_use]
    pub fn field(path: &str) -> Self {
        Self::Field(path.to_string())
    }

    #[must_use]
    pub fn lit(value: impl Into<Bson>) -> Self {
        Self::Literal(value.into())
    }

    #[must_use]
    pub fn floor(inner: Self) -> Self {
        Self::Floor(Box::new(inner))
    }

    #[must_use]
    pub fn divide(num: Self, den: Self) -> Self {
        Self::Divide(Box::new(num), Box::new(den))
    }

    #[must_use]
    pub fn multiply(a: Self, b: Self) -> Self {
        Self::Multiply(Box::new(a), Box::new(b))
    }

    #[must_use]
    pub fn concat(parts: Vec<Self>) -> Self {
        Self::Concat(parts)
    }

    /// String rendition of a scalar; integral doubles render without a
    /// fractional part (`199.0` becomes `"199"`).
    #[must_use]
    pub fn stringify(inner: Self) -> Self {
        Self::Stringify(Box::new(inner))
    }
}

/// An ordered stage sequence. Built once, consumed by [`run_pipeline`].
///
/// [`run_pipeline`]: crate::aggregate::run_pipeline
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn group(mut self, key: Expr, fields: Vec<(&str, Accumulator)>) -> Self {
        self.stages.push(Stage::Group {
            key,
            fields: fields.into_iter().map(|(n, a)| (n.to_string(), a)).collect(),
        });
        self
    }

    #[must_use]
    pub fn sort(mut self, keys: Vec<SortSpec>) -> Self {
        self.stages.push(Stage::Sort(keys));
        self
    }

    #[must_use]
    pub fn limit(mut self, n: usize) -> Self {
        self.stages.push(Stage::Limit(n));
        self
    }

    #[must_use]
    pub fn project(mut self, fields: Vec<(&str, ProjectField)>) -> Self {
        self.stages.push(Stage::Project(
            fields.into_iter().map(|(n, p)| (n.to_string(), p)).collect(),
        ));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }
}
