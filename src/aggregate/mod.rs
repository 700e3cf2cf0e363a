//! Ordered aggregation pipelines: group, sort, limit, and project stages
//! with a small expression language for derived fields.

mod exec;
mod stage;

pub use exec::run_pipeline;
pub use stage::{Accumulator, Expr, Pipeline, ProjectField, Stage};
