//! Walks a catalog in order against one collection and collects the
//! per-operation envelopes into a report. Operations are independent: a
//! failure is logged and recorded, never fatal to the rest of the run.

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::OperationDescriptor;
use crate::collection::Collection;
use crate::executor::{self, ResultEnvelope};

pub struct Runner {
    collection: Arc<Collection>,
    catalog: Vec<OperationDescriptor>,
}

impl Runner {
    #[must_use]
    pub fn new(collection: Arc<Collection>, catalog: Vec<OperationDescriptor>) -> Self {
        Self { collection, catalog }
    }

    /// Executes every descriptor strictly in catalog order. Sequencing
    /// matters: paginated finds rely on the collection not shifting under
    /// them mid-run.
    pub fn run(&self) -> RunReport {
        let mut envelopes = Vec::with_capacity(self.catalog.len());
        for descriptor in &self.catalog {
            let envelope = executor::execute(descriptor, &self.collection);
            match &envelope.error {
                None => log::info!("op {} ok: {}", descriptor.id, descriptor.label),
                Some(failure) => {
                    log::warn!(
                        "op {} failed: {} ({})",
                        descriptor.id,
                        descriptor.label,
                        failure.message
                    );
                }
            }
            envelopes.push(envelope);
        }
        RunReport { envelopes }
    }
}

/// Envelopes in catalog order.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub envelopes: Vec<ResultEnvelope>,
}

impl RunReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.envelopes.iter().filter(|e| e.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.envelopes.len() - self.passed()
    }

    #[must_use]
    pub fn get(&self, descriptor_id: u32) -> Option<&ResultEnvelope> {
        self.envelopes.iter().find(|e| e.descriptor_id == descriptor_id)
    }
}
