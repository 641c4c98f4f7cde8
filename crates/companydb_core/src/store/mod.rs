//! Document-store collaborator contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the capability set repositories rely on: insert, filtered
//!   find/update/delete, and reference population.
//! - Keep storage-engine details behind the `DocumentStore` trait.
//!
//! # Invariants
//! - A lookup that matches nothing is an explicit empty result, never an
//!   error.
//! - Engine failures propagate unchanged; no retry logic lives here.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod document;
mod sqlite;

pub use document::{Document, DocumentId, Filter, UpdateDoc, ID_FIELD};
pub use sqlite::SqliteDocumentStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by document-store operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidDocument(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidDocument(message) => {
                write!(f, "invalid persisted document: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// External document-store capability set.
///
/// Collections are addressed by name; documents are untyped field maps.
/// Returned documents carry their assigned identity under [`ID_FIELD`].
pub trait DocumentStore {
    /// Persists one document and returns its assigned identity.
    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<DocumentId>;

    /// Returns all matching documents in insertion order.
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Returns the first matching document, or `None` when nothing matches.
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Looks a document up by its assigned identity.
    fn get_by_id(&self, collection: &str, id: DocumentId) -> StoreResult<Option<Document>>;

    /// Applies a partial-field replacement to the first matching document.
    ///
    /// Returns the number of documents updated (0 or 1).
    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &UpdateDoc,
    ) -> StoreResult<u64>;

    /// Applies a partial-field replacement to every matching document.
    ///
    /// Returns the number of documents updated.
    fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &UpdateDoc,
    ) -> StoreResult<u64>;

    /// Deletes the first matching document. Returns the deleted count (0 or 1).
    fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Deletes every matching document. Returns the deleted count.
    fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Substitutes referenced documents for raw identifier values.
    ///
    /// For each document, when `ref_field` holds a string shaped like a
    /// document identity and a document with that identity exists in
    /// `target_collection`, the field value is replaced by the full target
    /// document. Values that are not identifier-shaped, or identifiers with
    /// no match, are left untouched.
    fn populate(
        &self,
        documents: Vec<Document>,
        ref_field: &str,
        target_collection: &str,
    ) -> StoreResult<Vec<Document>>;
}
