// Submodules for separation of concerns
mod eval;
mod exec;
mod explain;
mod types;

pub use eval::{compare_bson, compare_docs, eval_filter};
pub(crate) use eval::as_f64;
pub use exec::{apply_update, delete_one, find_docs, update_one};
pub use explain::{ExplainReport, explain_find};
pub use types::{
    CmpOp, DeleteReport, Filter, FindOptions, Order, Projection, SortSpec, UpdateDoc, UpdateReport,
};
