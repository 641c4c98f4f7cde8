//! Department repository: pass-through CRUD and single-reference
//! resolution.
//!
//! # Responsibility
//! - Delegate Department persistence to the injected store.
//! - Resolve one department reference to its record on demand.
//!
//! # Invariants
//! - Labels never resolve; only reference-valued fields are looked up.
//! - A dangling reference resolves to `None`, never an error.

use crate::model::department::Department;
use crate::model::employee::DepartmentField;
use crate::repo::{RepoError, RepoResult};
use crate::store::document::{Document, DocumentId, Filter, UpdateDoc};
use crate::store::DocumentStore;

/// Department persistence operations over an injected store handle.
pub struct DepartmentRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> DepartmentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists the record, returning it with its assigned identity.
    pub fn insert(&self, department: &Department) -> RepoResult<Department> {
        let id = self
            .store
            .insert_one(Department::COLLECTION, department.to_document())?;
        Ok(Department {
            id: Some(id),
            name: department.name.clone(),
        })
    }

    /// Returns all matching records in insertion order.
    pub fn find(&self, filter: &Filter) -> RepoResult<Vec<Department>> {
        let documents = self.store.find(Department::COLLECTION, filter)?;
        documents.iter().map(parse_department).collect()
    }

    /// Returns the first matching record, or `None`.
    pub fn find_one(&self, filter: &Filter) -> RepoResult<Option<Department>> {
        match self.store.find_one(Department::COLLECTION, filter)? {
            Some(document) => Ok(Some(parse_department(&document)?)),
            None => Ok(None),
        }
    }

    /// Looks a record up by its assigned identity.
    pub fn find_by_id(&self, id: DocumentId) -> RepoResult<Option<Department>> {
        match self.store.get_by_id(Department::COLLECTION, id)? {
            Some(document) => Ok(Some(parse_department(&document)?)),
            None => Ok(None),
        }
    }

    /// Resolves a department field: `Reference` values are looked up,
    /// `Label` values stay untouched and yield `None`.
    pub fn resolve(&self, field: &DepartmentField) -> RepoResult<Option<Department>> {
        match field.reference() {
            Some(id) => self.find_by_id(id),
            None => Ok(None),
        }
    }

    /// Updates the first matching record; returns the updated count.
    pub fn update_one(&self, filter: &Filter, update: &UpdateDoc) -> RepoResult<u64> {
        Ok(self
            .store
            .update_one(Department::COLLECTION, filter, update)?)
    }

    /// Updates every matching record; returns the updated count.
    pub fn update_many(&self, filter: &Filter, update: &UpdateDoc) -> RepoResult<u64> {
        Ok(self
            .store
            .update_many(Department::COLLECTION, filter, update)?)
    }

    /// Deletes the first matching record; returns the deleted count.
    pub fn delete_one(&self, filter: &Filter) -> RepoResult<u64> {
        Ok(self.store.delete_one(Department::COLLECTION, filter)?)
    }

    /// Deletes every matching record; returns the deleted count.
    pub fn delete_many(&self, filter: &Filter) -> RepoResult<u64> {
        Ok(self.store.delete_many(Department::COLLECTION, filter)?)
    }
}

fn parse_department(document: &Document) -> RepoResult<Department> {
    Department::from_document(document).ok_or_else(|| {
        RepoError::InvalidData("department document has no string `name`".to_string())
    })
}
