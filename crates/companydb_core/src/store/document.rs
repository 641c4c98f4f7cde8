//! Document, filter and update-payload primitives.
//!
//! # Responsibility
//! - Define the untyped document shape exchanged with the store.
//! - Provide equality filtering and partial-field-replacement payloads.
//!
//! # Invariants
//! - `_id` is reserved for the store-assigned identity and is never
//!   overwritten by an update payload.
//! - An empty filter matches every document.

use serde_json::Value;
use uuid::Uuid;

/// Untyped document body: a mapping from field names to JSON values.
pub type Document = serde_json::Map<String, Value>;

/// Stable identifier assigned by the store on first insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type DocumentId = Uuid;

/// Reserved field carrying the store-assigned identity in returned documents.
pub const ID_FIELD: &str = "_id";

/// Equality filter over document field values.
///
/// Every clause must match for a document to be selected. `Filter::default()`
/// (no clauses) matches all documents in a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Creates an empty match-all filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality clause on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Creates a filter matching a single document by store identity.
    pub fn by_id(id: DocumentId) -> Self {
        Self::new().eq(ID_FIELD, id.to_string())
    }

    /// Returns whether the document satisfies every clause.
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Partial-field-replacement payload for update operations.
///
/// Only the named fields are replaced; every other field of the matched
/// document is left as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateDoc {
    fields: Vec<(String, Value)>,
}

impl UpdateDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to `value` on every matched document.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Applies the payload to a document body in place.
    ///
    /// The reserved `_id` field is skipped so identity stays stable.
    pub fn apply(&self, document: &mut Document) {
        for (field, value) in &self.fields {
            if field == ID_FIELD {
                continue;
            }
            document.insert(field.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
