//! Dispatches one operation descriptor against a collection and captures
//! the outcome in a result envelope. The executor never propagates an
//! error: every failure lands in the envelope so the runner can keep going.

use bson::Document as BsonDocument;
use serde::Serialize;

use crate::aggregate;
use crate::catalog::{OperationDescriptor, OperationKind, OperationPayload};
use crate::collection::Collection;
use crate::errors::DbError;
use crate::query::{self, ExplainReport};

#[derive(Debug, Clone, Serialize)]
pub enum ResultData {
    Documents(Vec<BsonDocument>),
    Update { matched: u64, modified: u64 },
    Delete { deleted: u64 },
    Index { name: String },
    Explain(ExplainReport),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    MalformedPayload,
    StoreUnavailable,
    Query,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&DbError> for OpFailure {
    fn from(err: &DbError) -> Self {
        let kind = match err {
            DbError::MalformedPayload(_) => FailureKind::MalformedPayload,
            DbError::StoreUnavailable(_) | DbError::NoSuchCollection(_) | DbError::Io(_) => {
                FailureKind::StoreUnavailable
            }
            _ => FailureKind::Query,
        };
        Self { kind, message: err.to_string() }
    }
}

/// Per-operation outcome, created fresh on every execution.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEnvelope {
    pub descriptor_id: u32,
    pub label: String,
    pub kind: OperationKind,
    pub data: ResultData,
    pub error: Option<OpFailure>,
}

impl ResultEnvelope {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub fn execute(descriptor: &OperationDescriptor, col: &Collection) -> ResultEnvelope {
    let (data, error) = match run(descriptor, col) {
        Ok(data) => (data, None),
        Err(e) => (ResultData::None, Some(OpFailure::from(&e))),
    };
    ResultEnvelope {
        descriptor_id: descriptor.id,
        label: descriptor.label.clone(),
        kind: descriptor.kind(),
        data,
        error,
    }
}

fn run(descriptor: &OperationDescriptor, col: &Collection) -> Result<ResultData, DbError> {
    descriptor.validate()?;
    match &descriptor.payload {
        OperationPayload::Find { filter, options } => {
            Ok(ResultData::Documents(query::find_docs(col, filter, options)))
        }
        OperationPayload::UpdateOne { filter, update } => {
            let report = query::update_one(col, filter, update);
            if report.matched == 0 {
                // NotFound is a condition, not an error
                log::info!("update matched nothing on {}", col.name_str());
            }
            Ok(ResultData::Update { matched: report.matched, modified: report.modified })
        }
        OperationPayload::DeleteOne { filter } => {
            let report = query::delete_one(col, filter);
            Ok(ResultData::Delete { deleted: report.deleted })
        }
        OperationPayload::Aggregate { pipeline } => {
            Ok(ResultData::Documents(aggregate::run_pipeline(col, pipeline)?))
        }
        OperationPayload::CreateIndex { keys } => {
            Ok(ResultData::Index { name: col.create_index(keys) })
        }
        OperationPayload::Explain { filter, options } => {
            Ok(ResultData::Explain(query::explain_find(col, filter, options)))
        }
    }
}
