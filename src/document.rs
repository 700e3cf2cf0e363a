use crate::types::DocumentId;
use bson::Document as BsonDocument;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub data: BsonDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    #[must_use]
    pub fn new(data: BsonDocument) -> Self {
        let now = Utc::now();
        Self { id: DocumentId::new(), data, created_at: now, updated_at: now }
    }

    /// Swaps in a new body, keeping the identity and creation time.
    pub fn replace(&mut self, new_data: BsonDocument) {
        self.data = new_data;
        self.updated_at = Utc::now();
    }
}
