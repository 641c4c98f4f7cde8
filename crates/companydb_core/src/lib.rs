//! Core data-access layer for the company directory.
//! This crate is the single source of truth for entity field rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::Department;
pub use model::employee::{
    DepartmentField, Employee, EmployeeDraft, EmployeeValidationError, FieldError, ValueKind,
};
pub use repo::{
    DepartmentRepository, EmployeeRepository, PopulatedDepartment, PopulatedEmployee,
    RepoError, RepoResult,
};
pub use store::{
    Document, DocumentId, DocumentStore, Filter, SqliteDocumentStore, StoreError, StoreResult,
    UpdateDoc,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
