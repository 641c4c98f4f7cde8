use companydb_core::{
    DepartmentField, EmployeeDraft, FieldError, ValueKind,
};
use serde_json::{json, Value};
use uuid::Uuid;

fn draft(value: Value) -> EmployeeDraft {
    EmployeeDraft::new(value.as_object().cloned().unwrap())
}

#[test]
fn missing_first_name_is_reported_for_that_field_only() {
    let err = draft(json!({ "lastName": "Doe", "department": "IT" }))
        .validate()
        .unwrap_err();

    assert_eq!(err.field("firstName"), Some(&FieldError::Missing));
    assert_eq!(err.field("lastName"), None);
    assert_eq!(err.field("department"), None);
    assert_eq!(err.errors().len(), 1);
}

#[test]
fn missing_last_name_is_reported_for_that_field_only() {
    let err = draft(json!({ "firstName": "John", "department": "IT" }))
        .validate()
        .unwrap_err();

    assert_eq!(err.field("lastName"), Some(&FieldError::Missing));
    assert_eq!(err.errors().len(), 1);
}

#[test]
fn missing_department_is_reported_for_that_field_only() {
    let err = draft(json!({ "firstName": "John", "lastName": "Doe" }))
        .validate()
        .unwrap_err();

    assert_eq!(err.field("department"), Some(&FieldError::Missing));
    assert_eq!(err.errors().len(), 1);
}

#[test]
fn object_and_array_values_fail_the_string_rule_per_field() {
    let cases = [
        (json!({}), ValueKind::Object),
        (json!([]), ValueKind::Array),
    ];

    for (bad_value, kind) in cases {
        let err = draft(json!({
            "firstName": bad_value.clone(),
            "lastName": "Doe",
            "department": "IT",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(
            err.field("firstName"),
            Some(&FieldError::NotAString { found: kind })
        );
        assert_eq!(err.errors().len(), 1);

        let err = draft(json!({
            "firstName": "John",
            "lastName": bad_value.clone(),
            "department": "IT",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(
            err.field("lastName"),
            Some(&FieldError::NotAString { found: kind })
        );

        let err = draft(json!({
            "firstName": "John",
            "lastName": "Doe",
            "department": bad_value,
        }))
        .validate()
        .unwrap_err();
        assert_eq!(
            err.field("department"),
            Some(&FieldError::NotAString { found: kind })
        );
    }
}

#[test]
fn empty_field_map_reports_all_three_fields() {
    let err = draft(json!({})).validate().unwrap_err();

    assert_eq!(err.field("firstName"), Some(&FieldError::Missing));
    assert_eq!(err.field("lastName"), Some(&FieldError::Missing));
    assert_eq!(err.field("department"), Some(&FieldError::Missing));
    assert_eq!(err.errors().len(), 3);
}

#[test]
fn valid_drafts_produce_typed_records() {
    let cases = [
        ("John", "Doe", "IT"),
        ("Adam", "Kowalski", "Management"),
    ];

    for (first_name, last_name, department) in cases {
        let employee = draft(json!({
            "firstName": first_name,
            "lastName": last_name,
            "department": department,
        }))
        .validate()
        .unwrap();

        assert_eq!(employee.id, None);
        assert_eq!(employee.first_name, first_name);
        assert_eq!(employee.last_name, last_name);
        assert_eq!(employee.department, DepartmentField::Label(department.to_string()));
    }
}

#[test]
fn extra_fields_do_not_affect_validation() {
    let employee = draft(json!({
        "firstName": "John",
        "lastName": "Doe",
        "department": "IT",
        "badge": 42,
    }))
    .validate()
    .unwrap();

    assert_eq!(employee.first_name, "John");
}

#[test]
fn identifier_shaped_department_classifies_as_reference() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();

    let employee = draft(json!({
        "firstName": "John",
        "lastName": "Doe",
        "department": id.to_string(),
    }))
    .validate()
    .unwrap();

    assert_eq!(employee.department, DepartmentField::Reference(id));
    assert_eq!(employee.department.reference(), Some(id));
}

#[test]
fn label_department_has_no_reference() {
    let field = DepartmentField::parse("IT");
    assert_eq!(field, DepartmentField::Label("IT".to_string()));
    assert_eq!(field.reference(), None);
}

#[test]
fn department_field_round_trips_its_string_form() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();

    assert_eq!(DepartmentField::parse("IT").to_string(), "IT");
    assert_eq!(
        DepartmentField::parse(&id.to_string()).to_string(),
        id.to_string()
    );
}

#[test]
fn stored_id_is_picked_up_during_validation() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();

    let employee = draft(json!({
        "_id": id.to_string(),
        "firstName": "John",
        "lastName": "Doe",
        "department": "IT",
    }))
    .validate()
    .unwrap();

    assert_eq!(employee.id, Some(id));
}

#[test]
fn employee_serialization_uses_expected_wire_fields() {
    let employee = draft(json!({
        "firstName": "John",
        "lastName": "Doe",
        "department": "IT",
    }))
    .validate()
    .unwrap();

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["firstName"], "John");
    assert_eq!(json["lastName"], "Doe");
    assert_eq!(json["department"], "IT");
    assert_eq!(json.get("_id"), None);

    let decoded: companydb_core::Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn validation_error_display_names_each_field() {
    let err = draft(json!({ "firstName": {} })).validate().unwrap_err();
    let message = err.to_string();

    assert!(message.contains("firstName must be a string, got object"));
    assert!(message.contains("lastName is required"));
    assert!(message.contains("department is required"));
}
