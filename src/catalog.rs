//! Operation descriptors: the unit of work the runner hands the executor.
//!
//! A descriptor pairs a stable ordinal and a human-readable label with a
//! kind-specific payload. Descriptors are plain data; nothing here touches
//! a collection.

use serde::Serialize;

use crate::aggregate::Pipeline;
use crate::errors::DbError;
use crate::index::IndexKeys;
use crate::query::{Filter, FindOptions, UpdateDoc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperationKind {
    Find,
    UpdateOne,
    DeleteOne,
    Aggregate,
    CreateIndex,
    Explain,
}

#[derive(Debug, Clone)]
pub enum OperationPayload {
    Find { filter: Filter, options: FindOptions },
    UpdateOne { filter: Filter, update: UpdateDoc },
    DeleteOne { filter: Filter },
    Aggregate { pipeline: Pipeline },
    CreateIndex { keys: IndexKeys },
    Explain { filter: Filter, options: FindOptions },
}

#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Stable across runs; report entries correlate by this.
    pub id: u32,
    pub label: String,
    pub payload: OperationPayload,
}

impl OperationDescriptor {
    #[must_use]
    pub fn new(id: u32, label: &str, payload: OperationPayload) -> Self {
        Self { id, label: label.to_string(), payload }
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match &self.payload {
            OperationPayload::Find { .. } => OperationKind::Find,
            OperationPayload::UpdateOne { .. } => OperationKind::UpdateOne,
            OperationPayload::DeleteOne { .. } => OperationKind::DeleteOne,
            OperationPayload::Aggregate { .. } => OperationKind::Aggregate,
            OperationPayload::CreateIndex { .. } => OperationKind::CreateIndex,
            OperationPayload::Explain { .. } => OperationKind::Explain,
        }
    }

    /// Structural checks a payload must pass before it is worth executing.
    pub fn validate(&self) -> Result<(), DbError> {
        match &self.payload {
            OperationPayload::Aggregate { pipeline } if pipeline.is_empty() => {
                Err(DbError::MalformedPayload("aggregation pipeline has no stages".into()))
            }
            OperationPayload::CreateIndex { keys } if keys.is_empty() => {
                Err(DbError::MalformedPayload("index key spec is empty".into()))
            }
            OperationPayload::UpdateOne { update, .. } if update.is_empty() => {
                Err(DbError::MalformedPayload("update document has no operators".into()))
            }
            _ => Ok(()),
        }
    }
}
