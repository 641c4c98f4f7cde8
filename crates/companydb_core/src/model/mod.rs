//! Domain entities persisted through the document store.
//!
//! # Responsibility
//! - Define the Employee and Department records and their field rules.
//! - Keep the validation contract explicit and separate from construction.
//!
//! # Invariants
//! - Constructing a draft from arbitrary field values never fails.
//! - Validity is only established by an explicit `validate()` call.

pub mod department;
pub mod employee;
