//! Employee domain model and field validation.
//!
//! # Responsibility
//! - Define the validated Employee record and its draft form.
//! - Provide the tagged-field validator: a pure check from a candidate
//!   field map to per-field error descriptors.
//! - Distinguish label-valued from reference-valued department fields.
//!
//! # Invariants
//! - `firstName`, `lastName` and `department` are mandatory and must be
//!   JSON strings; objects and arrays never satisfy the string rule.
//! - A draft wraps any field map without failing; only `validate()` judges
//!   it.
//! - The department value keeps its exact string form across a
//!   persist/load round-trip, whether label or reference.

use crate::store::document::{Document, DocumentId, ID_FIELD};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub const FIELD_FIRST_NAME: &str = "firstName";
pub const FIELD_LAST_NAME: &str = "lastName";
pub const FIELD_DEPARTMENT: &str = "department";

const REQUIRED_STRING_FIELDS: &[&str] =
    &[FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_DEPARTMENT];

/// JSON value category reported by failed string checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// Per-field error descriptor produced by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The field is absent from the candidate map.
    Missing,
    /// The field is present but not string-typed.
    NotAString { found: ValueKind },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "is required"),
            Self::NotAString { found } => write!(f, "must be a string, got {found}"),
        }
    }
}

/// Validation outcome keyed by field name, one entry per invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeValidationError {
    errors: BTreeMap<String, FieldError>,
}

impl EmployeeValidationError {
    /// Returns the error recorded for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Returns all recorded field errors.
    pub fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "employee validation failed:")?;
        for (field, error) in &self.errors {
            write!(f, " {field} {error};")?;
        }
        Ok(())
    }
}

impl Error for EmployeeValidationError {}

/// Checks the candidate field map against the required-string rules.
///
/// Pure function: an empty result map means the candidate is valid.
pub fn validate_fields(fields: &Document) -> BTreeMap<String, FieldError> {
    let mut errors = BTreeMap::new();
    for field in REQUIRED_STRING_FIELDS {
        match fields.get(*field) {
            None => {
                errors.insert((*field).to_string(), FieldError::Missing);
            }
            Some(Value::String(_)) => {}
            Some(other) => {
                errors.insert(
                    (*field).to_string(),
                    FieldError::NotAString {
                        found: ValueKind::of(other),
                    },
                );
            }
        }
    }
    errors
}

/// Department field value: a free-text label or a reference to a
/// Department record.
///
/// The stored form is a plain string either way; classification is by
/// shape, so an identifier-shaped label is indistinguishable from a real
/// reference until resolution is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentField {
    Label(String),
    Reference(DocumentId),
}

impl DepartmentField {
    /// Classifies a raw string value by identifier shape.
    pub fn parse(value: &str) -> Self {
        match Uuid::parse_str(value) {
            Ok(id) => Self::Reference(id),
            Err(_) => Self::Label(value.to_string()),
        }
    }

    /// Returns the referenced identity for reference-valued fields.
    pub fn reference(&self) -> Option<DocumentId> {
        match self {
            Self::Reference(id) => Some(*id),
            Self::Label(_) => None,
        }
    }
}

impl Display for DepartmentField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{label}"),
            Self::Reference(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for DepartmentField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DepartmentField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(text) => Ok(Self::parse(&text)),
            other => Err(D::Error::custom(format!(
                "department must be a string, got {}",
                ValueKind::of(&other)
            ))),
        }
    }
}

/// Unvalidated Employee candidate wrapping an arbitrary field map.
///
/// Construction never fails; call [`EmployeeDraft::validate`] to obtain a
/// typed [`Employee`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDraft {
    fields: Document,
}

impl EmployeeDraft {
    pub fn new(fields: Document) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    /// Runs the field validator and, on success, parses the typed record.
    pub fn validate(&self) -> Result<Employee, EmployeeValidationError> {
        let errors = validate_fields(&self.fields);
        if !errors.is_empty() {
            return Err(EmployeeValidationError { errors });
        }

        // Validation guarantees the three fields are present strings.
        let id = self
            .fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|text| Uuid::parse_str(text).ok());

        Ok(Employee {
            id,
            first_name: required_string(&self.fields, FIELD_FIRST_NAME),
            last_name: required_string(&self.fields, FIELD_LAST_NAME),
            department: DepartmentField::parse(&required_string(
                &self.fields,
                FIELD_DEPARTMENT,
            )),
        })
    }
}

/// Validated Employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Store-assigned identity; `None` until first persistence.
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub id: Option<DocumentId>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub department: DepartmentField,
}

impl Employee {
    /// Collection name used for Employee documents.
    pub const COLLECTION: &'static str = "employees";

    /// Creates an unsaved record from already-typed fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: DepartmentField,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            department,
        }
    }

    /// Parses a stored document, applying the same rules as draft
    /// validation.
    pub fn from_document(document: &Document) -> Result<Self, EmployeeValidationError> {
        EmployeeDraft::new(document.clone()).validate()
    }

    /// Renders the persistable field map. Identity is excluded: the store
    /// owns it.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(
            FIELD_FIRST_NAME.to_string(),
            Value::String(self.first_name.clone()),
        );
        document.insert(
            FIELD_LAST_NAME.to_string(),
            Value::String(self.last_name.clone()),
        );
        document.insert(
            FIELD_DEPARTMENT.to_string(),
            Value::String(self.department.to_string()),
        );
        document
    }
}

fn required_string(fields: &Document, field: &str) -> String {
    fields
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
