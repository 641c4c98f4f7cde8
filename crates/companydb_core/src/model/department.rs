//! Department domain model.
//!
//! # Responsibility
//! - Define the minimal named Department record.
//!
//! # Invariants
//! - Nothing cascades into a Department from Employee lifecycle events;
//!   employees hold weak references only.

use crate::store::document::{Document, DocumentId, ID_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const FIELD_NAME: &str = "name";

/// Named department record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Store-assigned identity; `None` until first persistence.
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub id: Option<DocumentId>,
    pub name: String,
}

impl Department {
    /// Collection name used for Department documents.
    pub const COLLECTION: &'static str = "departments";

    /// Creates an unsaved record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Parses a stored document; `None` when `name` is absent or not a
    /// string.
    pub fn from_document(document: &Document) -> Option<Self> {
        let name = document.get(FIELD_NAME)?.as_str()?.to_string();
        let id = document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|text| Uuid::parse_str(text).ok());
        Some(Self { id, name })
    }

    /// Renders the persistable field map. Identity is excluded: the store
    /// owns it.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(FIELD_NAME.to_string(), Value::String(self.name.clone()));
        document
    }
}
