//! Typed repositories over the document-store collaborator.
//!
//! # Responsibility
//! - Translate between typed records and untyped store documents.
//! - Enforce the validation contract on Employee write paths.
//!
//! # Invariants
//! - Repositories add no business logic beyond field validation.
//! - Store failures propagate unchanged; not-found lookups are `None` or
//!   zero counts, never errors.

use crate::model::employee::EmployeeValidationError;
use crate::store::document::DocumentId;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod department_repo;
pub mod employee_repo;

pub use department_repo::DepartmentRepository;
pub use employee_repo::{EmployeeRepository, PopulatedDepartment, PopulatedEmployee};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EmployeeValidationError),
    Store(StoreError),
    NotFound(DocumentId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
