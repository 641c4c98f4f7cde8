//! Employee repository: validated pass-through CRUD plus reference
//! population.
//!
//! # Responsibility
//! - Gate every insert behind the draft validation contract.
//! - Delegate filtering, updates and deletes to the injected store.
//! - Expose population of the department reference as a read model.
//!
//! # Invariants
//! - No document reaches the store without passing `validate()` first.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::department::Department;
use crate::model::employee::{
    DepartmentField, Employee, EmployeeDraft, FIELD_DEPARTMENT, FIELD_FIRST_NAME,
    FIELD_LAST_NAME,
};
use crate::repo::{RepoError, RepoResult};
use crate::store::document::{Document, DocumentId, Filter, UpdateDoc, ID_FIELD};
use crate::store::DocumentStore;
use serde_json::Value;
use uuid::Uuid;

/// Read model produced by reference population.
///
/// The department slot carries whatever resolution produced: the original
/// label, the full referenced record, or the dangling identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedEmployee {
    pub id: Option<DocumentId>,
    pub first_name: String,
    pub last_name: String,
    pub department: PopulatedDepartment,
}

/// Department slot of a populated result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulatedDepartment {
    /// Free-text label; resolution never applies.
    Label(String),
    /// Reference that matched a Department record.
    Resolved(Department),
    /// Identifier-shaped value with no matching record.
    Unresolved(DocumentId),
}

impl PopulatedDepartment {
    /// Returns the resolved record, if resolution succeeded.
    pub fn resolved(&self) -> Option<&Department> {
        match self {
            Self::Resolved(department) => Some(department),
            _ => None,
        }
    }
}

/// Employee persistence operations over an injected store handle.
pub struct EmployeeRepository<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> EmployeeRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validates the draft and persists it, returning the record with its
    /// assigned identity.
    pub fn insert(&self, draft: &EmployeeDraft) -> RepoResult<Employee> {
        let mut employee = draft.validate()?;
        let id = self
            .store
            .insert_one(Employee::COLLECTION, employee.to_document())?;
        employee.id = Some(id);
        Ok(employee)
    }

    /// Persists an already-typed record: insert when unsaved, full-field
    /// update by identity otherwise.
    pub fn save(&self, employee: &Employee) -> RepoResult<DocumentId> {
        match employee.id {
            None => {
                let id = self
                    .store
                    .insert_one(Employee::COLLECTION, employee.to_document())?;
                Ok(id)
            }
            Some(id) => {
                let update = UpdateDoc::new()
                    .set(FIELD_FIRST_NAME, employee.first_name.clone())
                    .set(FIELD_LAST_NAME, employee.last_name.clone())
                    .set(FIELD_DEPARTMENT, employee.department.to_string());
                let changed =
                    self.store
                        .update_one(Employee::COLLECTION, &Filter::by_id(id), &update)?;
                if changed == 0 {
                    return Err(RepoError::NotFound(id));
                }
                Ok(id)
            }
        }
    }

    /// Returns all matching records in insertion order.
    pub fn find(&self, filter: &Filter) -> RepoResult<Vec<Employee>> {
        let documents = self.store.find(Employee::COLLECTION, filter)?;
        documents
            .iter()
            .map(|document| Employee::from_document(document).map_err(RepoError::from))
            .collect()
    }

    /// Returns the first matching record, or `None`.
    pub fn find_one(&self, filter: &Filter) -> RepoResult<Option<Employee>> {
        match self.store.find_one(Employee::COLLECTION, filter)? {
            Some(document) => Ok(Some(Employee::from_document(&document)?)),
            None => Ok(None),
        }
    }

    /// Updates the first matching record; returns the updated count.
    pub fn update_one(&self, filter: &Filter, update: &UpdateDoc) -> RepoResult<u64> {
        Ok(self.store.update_one(Employee::COLLECTION, filter, update)?)
    }

    /// Updates every matching record; returns the updated count.
    pub fn update_many(&self, filter: &Filter, update: &UpdateDoc) -> RepoResult<u64> {
        Ok(self.store.update_many(Employee::COLLECTION, filter, update)?)
    }

    /// Deletes the first matching record; returns the deleted count.
    pub fn delete_one(&self, filter: &Filter) -> RepoResult<u64> {
        Ok(self.store.delete_one(Employee::COLLECTION, filter)?)
    }

    /// Deletes every matching record; returns the deleted count.
    pub fn delete_many(&self, filter: &Filter) -> RepoResult<u64> {
        Ok(self.store.delete_many(Employee::COLLECTION, filter)?)
    }

    /// Finds matching records with the department reference populated.
    ///
    /// Reference-valued fields that match a Department record come back
    /// resolved; labels and dangling identifiers come back as stored.
    pub fn find_populated(&self, filter: &Filter) -> RepoResult<Vec<PopulatedEmployee>> {
        let documents = self.store.find(Employee::COLLECTION, filter)?;
        let populated =
            self.store
                .populate(documents, FIELD_DEPARTMENT, Department::COLLECTION)?;

        populated.iter().map(parse_populated).collect()
    }
}

fn parse_populated(document: &Document) -> RepoResult<PopulatedEmployee> {
    let id = document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|text| Uuid::parse_str(text).ok());

    let first_name = populated_string(document, FIELD_FIRST_NAME)?;
    let last_name = populated_string(document, FIELD_LAST_NAME)?;

    let department = match document.get(FIELD_DEPARTMENT) {
        Some(Value::String(raw)) => match DepartmentField::parse(raw) {
            DepartmentField::Label(label) => PopulatedDepartment::Label(label),
            DepartmentField::Reference(target) => PopulatedDepartment::Unresolved(target),
        },
        Some(Value::Object(body)) => {
            let department = Department::from_document(body).ok_or_else(|| {
                RepoError::InvalidData(
                    "populated department document has no string `name`".to_string(),
                )
            })?;
            PopulatedDepartment::Resolved(department)
        }
        _ => {
            return Err(RepoError::InvalidData(
                "employee document has no usable `department` field".to_string(),
            ));
        }
    };

    Ok(PopulatedEmployee {
        id,
        first_name,
        last_name,
        department,
    })
}

fn populated_string(document: &Document, field: &str) -> RepoResult<String> {
    document
        .get(field)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("employee document has no string `{field}`"))
        })
}
